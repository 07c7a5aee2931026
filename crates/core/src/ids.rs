#![forbid(unsafe_code)]

//! Row identifiers. Every entity is addressed by its SQLite rowid wrapped in a
//! dedicated newtype so a `TaskId` can never be passed where a `VenueId` is expected.

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(UserId);
entity_id!(SupplierId);
entity_id!(ContractId);
entity_id!(EventId);
entity_id!(VenueId);
entity_id!(
    /// Identifier of an event/supplier engagement row (`event_suppliers.list_id`).
    ListId
);
entity_id!(TaskId);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Supplier,
    Contract,
    Event,
    Venue,
    Engagement,
    Task,
    Preference,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Supplier => "supplier",
            Self::Contract => "contract",
            Self::Event => "event",
            Self::Venue => "venue",
            Self::Engagement => "engagement",
            Self::Task => "task",
            Self::Preference => "preference",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
