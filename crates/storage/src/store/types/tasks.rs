#![forbid(unsafe_code)]

use ec_core::{EventId, TaskId, UserId};
use time::Date;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskRow {
    pub task_id: TaskId,
    pub event_id: EventId,
    pub description: String,
    pub category: Option<String>,
    pub responsible_user_id: Option<UserId>,
    pub eta: Option<Date>,
    pub status: String,
    pub prev_task_id: Option<TaskId>,
    pub next_task_id: Option<TaskId>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// Outcome of [`crate::SqliteStore::repair_chain`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChainRepair {
    /// Fragments found before stitching; 1 (or 0 for an empty event) means nothing was broken.
    pub fragments: usize,
    /// Tasks whose pointers were rewritten.
    pub relinked: usize,
}
