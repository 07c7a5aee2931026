#![forbid(unsafe_code)]

use crate::ids::VenueId;

pub const DEFAULT_EVENT_STATUS: &str = "PLANNED";
pub const TERMINAL_EVENT_STATUSES: &[&str] = &["COMPLETED", "CANCELLED"];

pub fn is_terminal_event_status(code: &str) -> bool {
    TERMINAL_EVENT_STATUSES.iter().any(|status| *status == code)
}

/// Amount in minor currency units (agorot/cents). Prices are never floats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    pub const fn minor(self) -> i64 {
        self.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VenueAddon {
    pub enabled: bool,
    pub price: Money,
}

impl VenueAddon {
    pub const fn off() -> Self {
        Self {
            enabled: false,
            price: Money::ZERO,
        }
    }

    pub const fn on(price: Money) -> Self {
        Self {
            enabled: true,
            price,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VenueAddons {
    pub sound: VenueAddon,
    pub design: VenueAddon,
    pub lighting: VenueAddon,
    pub bar: VenueAddon,
}

impl VenueAddons {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, VenueAddon)> {
        [
            ("sound", self.sound),
            ("design", self.design),
            ("lighting", self.lighting),
            ("bar", self.bar),
        ]
        .into_iter()
    }

    pub fn has_negative_price(&self) -> bool {
        self.iter().any(|(_, addon)| addon.price.is_negative())
    }

    /// Sum of enabled add-on prices; `None` on overflow.
    pub fn enabled_total(&self) -> Option<Money> {
        self.iter()
            .filter(|(_, addon)| addon.enabled)
            .try_fold(Money::ZERO, |acc, (_, addon)| acc.checked_add(addon.price))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VenueCost {
    NoVenueSelected,
    Selected {
        venue_id: VenueId,
        base: Money,
        addons: Money,
        total: Money,
    },
}

impl VenueCost {
    pub fn for_venue(venue_id: VenueId, agreed_price: Money, addons: &VenueAddons) -> Option<Self> {
        let addons = addons.enabled_total()?;
        let total = agreed_price.checked_add(addons)?;
        Some(Self::Selected {
            venue_id,
            base: agreed_price,
            addons,
            total,
        })
    }

    pub fn total(&self) -> Option<Money> {
        match self {
            Self::NoVenueSelected => None,
            Self::Selected { total, .. } => Some(*total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_display_keeps_two_minor_digits() {
        assert_eq!(Money::from_minor(123_45).to_string(), "123.45");
        assert_eq!(Money::from_minor(5).to_string(), "0.05");
        assert_eq!(Money::from_minor(-250).to_string(), "-2.50");
    }

    #[test]
    fn venue_cost_only_counts_enabled_addons() {
        let addons = VenueAddons {
            sound: VenueAddon::on(Money::from_minor(1_000)),
            design: VenueAddon {
                enabled: false,
                price: Money::from_minor(9_999),
            },
            lighting: VenueAddon::on(Money::from_minor(500)),
            bar: VenueAddon::off(),
        };
        let cost = VenueCost::for_venue(VenueId::new(7), Money::from_minor(10_000), &addons)
            .expect("no overflow");
        assert_eq!(
            cost,
            VenueCost::Selected {
                venue_id: VenueId::new(7),
                base: Money::from_minor(10_000),
                addons: Money::from_minor(1_500),
                total: Money::from_minor(11_500),
            }
        );
    }

    #[test]
    fn venue_cost_reports_overflow() {
        let addons = VenueAddons {
            bar: VenueAddon::on(Money::from_minor(1)),
            ..VenueAddons::default()
        };
        let cost = VenueCost::for_venue(VenueId::new(1), Money::from_minor(i64::MAX), &addons);
        assert!(cost.is_none());
    }

    #[test]
    fn terminal_statuses() {
        assert!(is_terminal_event_status("COMPLETED"));
        assert!(is_terminal_event_status("CANCELLED"));
        assert!(!is_terminal_event_status(DEFAULT_EVENT_STATUS));
    }
}
