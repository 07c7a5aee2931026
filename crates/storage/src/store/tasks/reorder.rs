#![forbid(unsafe_code)]

use super::super::*;
use super::{ensure_anchor, task_by_id};
use ec_core::TaskId;
use tracing::{debug, info};

impl SqliteStore {
    /// Splices the task out of its chain and deletes it. The neighbours are bridged to each
    /// other. Returns the task as it was before removal.
    pub fn remove_task(&mut self, task_id: TaskId) -> Result<TaskRow, StoreError> {
        let tx = begin_write(&mut self.conn)?;
        let row = task_by_id(&tx, task_id)?;
        let event_id = row.event_id;

        let before = load_verified_chain(&tx, event_id)?;
        let mut chain = before.clone();
        chain
            .remove(task_id)
            .map_err(|err| chain_error(event_id, err))?;
        let relinked = persist_chain_tx(&tx, &before, &chain, Some(task_id), now_ms())?;
        tx.commit()?;

        info!(
            event_id = event_id.get(),
            task_id = task_id.get(),
            relinked,
            "task removed"
        );
        Ok(row)
    }

    /// Moves the task right after `after` (or to the head) in one transaction. Returns
    /// `false` when the task already sits there.
    pub fn move_task(
        &mut self,
        task_id: TaskId,
        after: Option<TaskId>,
    ) -> Result<bool, StoreError> {
        let tx = begin_write(&mut self.conn)?;
        let row = task_by_id(&tx, task_id)?;
        let event_id = row.event_id;
        if after == Some(task_id) {
            return Err(StoreError::CycleDetected { task_id });
        }

        let before = load_verified_chain(&tx, event_id)?;
        ensure_anchor(&before, event_id, after)?;
        let mut chain = before.clone();
        let moved = chain
            .move_after(task_id, after)
            .map_err(|err| chain_error(event_id, err))?;
        if !moved {
            debug!(task_id = task_id.get(), "task already in place");
            return Ok(false);
        }
        let relinked = persist_chain_tx(&tx, &before, &chain, None, now_ms())?;
        tx.commit()?;

        info!(
            event_id = event_id.get(),
            task_id = task_id.get(),
            after = ?after.map(TaskId::get),
            relinked,
            "task moved"
        );
        Ok(true)
    }
}
