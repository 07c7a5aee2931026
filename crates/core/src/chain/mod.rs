#![forbid(unsafe_code)]

//! Per-event task ordering held as an identifier-addressed arena.
//!
//! Tasks are never linked through in-memory references: each task id maps to its
//! `prev`/`next` neighbour ids, and every traversal is a bounded sequence of map lookups.
//! A `TaskChain` is valid when it has exactly one head, exactly one tail, symmetric links
//! and a head-to-tail walk that visits every member once (or when it is empty).

mod arena;
mod types;
mod walk;

pub use arena::*;
pub use types::*;
pub use walk::*;
