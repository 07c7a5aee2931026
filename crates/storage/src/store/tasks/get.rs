#![forbid(unsafe_code)]

use super::super::users::user_by_id;
use super::super::*;
use super::task_by_id;
use ec_core::{LookupDomain, TaskId};
use rusqlite::params;
use tracing::info;

impl SqliteStore {
    pub fn get_task(&self, task_id: TaskId) -> Result<TaskRow, StoreError> {
        task_by_id(&self.conn, task_id)
    }

    /// Edits task details. Position in the chain only changes through the chain operations.
    pub fn update_task(
        &mut self,
        task_id: TaskId,
        update: TaskUpdate,
    ) -> Result<TaskRow, StoreError> {
        let TaskUpdate {
            description,
            category,
            responsible_user_id,
            eta,
            status,
        } = update;

        let description = description
            .map(|description| {
                let description = description.trim().to_string();
                if description.is_empty() {
                    Err(StoreError::InvalidInput("task description must not be empty"))
                } else {
                    Ok(description)
                }
            })
            .transpose()?;
        let status = status
            .map(|status| require_code(&self.lookups, LookupDomain::TaskStatus, &status))
            .transpose()?;
        let category = category
            .map(|category| {
                require_optional_code(
                    &self.lookups,
                    LookupDomain::TaskCategory,
                    category.as_deref(),
                )
            })
            .transpose()?;

        let tx = begin_write(&mut self.conn)?;
        let current = task_by_id(&tx, task_id)?;
        if let Some(Some(responsible)) = responsible_user_id {
            user_by_id(&tx, responsible)?;
        }

        tx.execute(
            "UPDATE tasks SET description=?2, category=?3, responsible_user_id=?4, eta=?5, \
             status=?6, updated_at_ms=?7 WHERE task_id=?1",
            params![
                task_id.get(),
                description.unwrap_or(current.description),
                category.unwrap_or(current.category),
                responsible_user_id
                    .unwrap_or(current.responsible_user_id)
                    .map(|id| id.get()),
                eta.unwrap_or(current.eta),
                status.unwrap_or(current.status),
                now_ms()
            ],
        )?;
        let row = task_by_id(&tx, task_id)?;
        tx.commit()?;

        info!(task_id = task_id.get(), status = %row.status, "task updated");
        Ok(row)
    }
}
