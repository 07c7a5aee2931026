#![forbid(unsafe_code)]

mod chain_tx;
mod clock;
mod constraints;
mod lookups_tx;
mod rows;
mod schema;

pub(super) use chain_tx::*;
pub(super) use clock::now_ms;
pub(super) use constraints::*;
pub(super) use lookups_tx::*;
pub(super) use rows::*;
pub(super) use schema::{install_schema, preflight_gate};
