#![forbid(unsafe_code)]

mod create;
mod get;
mod reorder;
mod repair;
mod sequence;

pub use sequence::{TaskSequence, TaskSequenceIter};

use super::*;
use ec_core::{EntityKind, EventId, TaskId};
use rusqlite::{OptionalExtension, params};

pub(super) fn task_by_id(conn: &Connection, task_id: TaskId) -> Result<TaskRow, StoreError> {
    conn.query_row(
        &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE task_id=?1"),
        params![task_id.get()],
        task_row,
    )
    .optional()?
    .ok_or(StoreError::not_found(EntityKind::Task, task_id.get()))
}

fn tasks_of_event(conn: &Connection, event_id: EventId) -> Result<Vec<TaskRow>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE event_id=?1 ORDER BY task_id ASC"
    ))?;
    let rows = stmt
        .query_map(params![event_id.get()], task_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// `anchor` must be a task of `event_id`'s chain.
fn ensure_anchor(
    chain: &ec_core::TaskChain,
    event_id: EventId,
    anchor: Option<TaskId>,
) -> Result<(), StoreError> {
    match anchor {
        Some(anchor) if !chain.contains(anchor) => Err(StoreError::InvalidReference {
            entity: EntityKind::Task,
            id: anchor.get(),
            owner: EntityKind::Event,
            owner_id: event_id.get(),
        }),
        _ => Ok(()),
    }
}
