#![forbid(unsafe_code)]

pub mod chain;
pub mod ids;
pub mod lookup;
pub mod model;
pub mod prefs;

pub use chain::{ChainError, ChainFault, ChainLinks, ChainWalk, LinkChange, TaskChain};
pub use ids::{ContractId, EntityKind, EventId, ListId, SupplierId, TaskId, UserId, VenueId};
pub use lookup::{LookupDomain, LookupEntry, LookupRegistry};
pub use model::{
    DEFAULT_EVENT_STATUS, Money, VenueAddon, VenueAddons, VenueCost, is_terminal_event_status,
};
pub use prefs::PreferenceType;
