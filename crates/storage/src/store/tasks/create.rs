#![forbid(unsafe_code)]

use super::super::events::event_by_id;
use super::super::users::user_by_id;
use super::super::*;
use super::{ensure_anchor, task_by_id};
use ec_core::{EventId, LookupDomain, TaskId};
use rusqlite::params;
use tracing::info;

impl SqliteStore {
    /// Inserts a new task right after `after`, or at the head when `after` is `None`.
    ///
    /// The new task takes over `after`'s old successor; both neighbours are rewired in the
    /// same transaction. `after` must belong to `event_id` (`InvalidReference`).
    pub fn create_task(
        &mut self,
        event_id: EventId,
        after: Option<TaskId>,
        task: NewTask,
    ) -> Result<TaskRow, StoreError> {
        self.insert_task(event_id, Placement::After(after), task)
    }

    /// Inserts after the current tail.
    pub fn append_task(&mut self, event_id: EventId, task: NewTask) -> Result<TaskRow, StoreError> {
        self.insert_task(event_id, Placement::Tail, task)
    }

    fn insert_task(
        &mut self,
        event_id: EventId,
        placement: Placement,
        task: NewTask,
    ) -> Result<TaskRow, StoreError> {
        let description = task.description.trim();
        if description.is_empty() {
            return Err(StoreError::InvalidInput("task description must not be empty"));
        }
        let status = require_code(&self.lookups, LookupDomain::TaskStatus, &task.status)?;
        let category = require_optional_code(
            &self.lookups,
            LookupDomain::TaskCategory,
            task.category.as_deref(),
        )?;

        let now_ms = now_ms();
        let tx = begin_write(&mut self.conn)?;
        event_by_id(&tx, event_id)?;
        if let Some(responsible) = task.responsible_user_id {
            user_by_id(&tx, responsible)?;
        }
        let before = load_verified_chain(&tx, event_id)?;
        let after = match placement {
            Placement::After(after) => after,
            Placement::Tail => before.tail(),
        };
        ensure_anchor(&before, event_id, after)?;

        tx.execute(
            "INSERT INTO tasks(event_id, description, category, responsible_user_id, eta, status, \
               prev_task_id, next_task_id, created_at_ms, updated_at_ms) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL, NULL, ?7, ?7)",
            params![
                event_id.get(),
                description,
                category,
                task.responsible_user_id.map(|id| id.get()),
                task.eta,
                status,
                now_ms
            ],
        )?;
        let task_id = TaskId::new(tx.last_insert_rowid());

        let mut chain = before.clone();
        chain
            .insert_after(after, task_id)
            .map_err(|err| chain_error(event_id, err))?;
        persist_chain_tx(&tx, &before, &chain, None, now_ms)?;
        let row = task_by_id(&tx, task_id)?;
        tx.commit()?;

        info!(
            event_id = event_id.get(),
            task_id = task_id.get(),
            after = ?after.map(TaskId::get),
            "task inserted"
        );
        Ok(row)
    }
}

enum Placement {
    After(Option<TaskId>),
    Tail,
}
