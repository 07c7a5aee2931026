#![forbid(unsafe_code)]
//! SQLite-backed event engine: per-event task chains, venue selection, supplier engagements
//! with frozen financial snapshots, typed user preferences and the lookup code tables that
//! validate them.

mod store;

pub use store::*;
