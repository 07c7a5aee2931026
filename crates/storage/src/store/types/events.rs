#![forbid(unsafe_code)]

use ec_core::{EventId, UserId, is_terminal_event_status};
use time::{Date, Time};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventRow {
    pub event_id: EventId,
    pub celeb_user_id: UserId,
    pub name: String,
    pub event_date: Date,
    pub event_time: Option<Time>,
    pub guests_num: i64,
    pub status: String,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

impl EventRow {
    pub fn is_terminal(&self) -> bool {
        is_terminal_event_status(&self.status)
    }
}
