#![forbid(unsafe_code)]

use ec_core::{EventId, Money, VenueAddons, VenueId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VenueRow {
    pub venue_id: VenueId,
    pub event_id: EventId,
    pub name: String,
    /// `None` means no declared capacity limit.
    pub max_guests: Option<i64>,
    pub agreed_price: Money,
    pub addons: VenueAddons,
    pub is_selected: bool,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

impl VenueRow {
    pub fn admits(&self, guests: i64) -> bool {
        self.max_guests.is_none_or(|max| guests <= max)
    }
}
