#![forbid(unsafe_code)]

use super::super::StoreError;
use ec_core::{ChainError, ChainLinks, EntityKind, EventId, TaskChain, TaskId};
use rusqlite::{Connection, Transaction, params};
use tracing::warn;

/// Arena view of one event's task pointers, exactly as stored.
pub(in crate::store) fn load_chain(
    conn: &Connection,
    event_id: EventId,
) -> Result<TaskChain, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT task_id, prev_task_id, next_task_id FROM tasks WHERE event_id=?1",
    )?;
    let mut rows = stmt.query(params![event_id.get()])?;
    let mut links = Vec::new();
    while let Some(row) = rows.next()? {
        let task = TaskId::new(row.get(0)?);
        let prev = row.get::<_, Option<i64>>(1)?.map(TaskId::new);
        let next = row.get::<_, Option<i64>>(2)?.map(TaskId::new);
        links.push((task, ChainLinks::new(prev, next)));
    }
    Ok(TaskChain::from_links(links))
}

/// Loads the chain and refuses to hand out a corrupt one.
pub(in crate::store) fn load_verified_chain(
    conn: &Connection,
    event_id: EventId,
) -> Result<TaskChain, StoreError> {
    let chain = load_chain(conn, event_id)?;
    if let Err(fault) = chain.verify() {
        warn!(event_id = event_id.get(), fault = %fault, "task chain integrity fault");
        return Err(StoreError::ChainCorrupted { event_id, fault });
    }
    Ok(chain)
}

pub(in crate::store) fn chain_error(event_id: EventId, err: ChainError) -> StoreError {
    match err {
        ChainError::UnknownTask(task) => StoreError::InvalidReference {
            entity: EntityKind::Task,
            id: task.get(),
            owner: EntityKind::Event,
            owner_id: event_id.get(),
        },
        ChainError::DuplicateTask(_) => StoreError::InvalidInput("task is already chained"),
        ChainError::SelfAnchor(task_id) => StoreError::CycleDetected { task_id },
        ChainError::Corrupted(fault) => {
            warn!(event_id = event_id.get(), fault = %fault, "task chain integrity fault");
            StoreError::ChainCorrupted { event_id, fault }
        }
    }
}

/// Writes the pointer difference between `before` and `after`. `removed` (present in
/// `before` only) is deleted.
///
/// Touched rows are detached first so the unique prev/next indexes never see two rows
/// claiming the same neighbour mid-statement.
pub(in crate::store) fn persist_chain_tx(
    tx: &Transaction<'_>,
    before: &TaskChain,
    after: &TaskChain,
    removed: Option<TaskId>,
    now_ms: i64,
) -> Result<usize, StoreError> {
    let changes = after.changes_since(before);

    for change in changes.iter().filter(|change| change.before.is_some()) {
        tx.execute(
            "UPDATE tasks SET prev_task_id=NULL, next_task_id=NULL WHERE task_id=?1",
            params![change.task.get()],
        )?;
    }

    if let Some(task) = removed {
        tx.execute("DELETE FROM tasks WHERE task_id=?1", params![task.get()])?;
    }

    for change in &changes {
        tx.execute(
            "UPDATE tasks SET prev_task_id=?2, next_task_id=?3, updated_at_ms=?4 WHERE task_id=?1",
            params![
                change.task.get(),
                change.after.prev.map(TaskId::get),
                change.after.next.map(TaskId::get),
                now_ms
            ],
        )?;
    }

    Ok(changes.len())
}
