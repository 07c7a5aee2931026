#![forbid(unsafe_code)]

use super::super::events::event_by_id;
use super::super::*;
use super::tasks_of_event;
use ec_core::{ChainLinks, ChainWalk, EntityKind, EventId, TaskChain, TaskId};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Tasks of one event, read in a single transaction, in chain order.
///
/// Iteration follows `next` pointers from the head and stops after at most `len()` steps. A
/// broken chain yields one `ChainCorrupted` error and then ends. Each call to
/// [`TaskSequence::iter`] starts again from the head.
#[derive(Clone, Debug)]
pub struct TaskSequence {
    event_id: EventId,
    chain: TaskChain,
    rows: BTreeMap<TaskId, TaskRow>,
}

impl TaskSequence {
    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> TaskSequenceIter<'_> {
        TaskSequenceIter {
            event_id: self.event_id,
            walk: self.chain.walk(),
            rows: &self.rows,
        }
    }
}

impl<'a> IntoIterator for &'a TaskSequence {
    type Item = Result<&'a TaskRow, StoreError>;
    type IntoIter = TaskSequenceIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Clone, Debug)]
pub struct TaskSequenceIter<'a> {
    event_id: EventId,
    walk: ChainWalk<'a>,
    rows: &'a BTreeMap<TaskId, TaskRow>,
}

impl<'a> Iterator for TaskSequenceIter<'a> {
    type Item = Result<&'a TaskRow, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.walk.next()? {
            Ok(task) => Some(
                self.rows
                    .get(&task)
                    .ok_or(StoreError::not_found(EntityKind::Task, task.get())),
            ),
            Err(fault) => {
                warn!(event_id = self.event_id.get(), fault = %fault, "task chain integrity fault");
                Some(Err(StoreError::ChainCorrupted {
                    event_id: self.event_id,
                    fault,
                }))
            }
        }
    }
}

impl SqliteStore {
    /// Lazy head-to-tail view of the event's tasks. Faults surface while iterating.
    pub fn task_sequence(&self, event_id: EventId) -> Result<TaskSequence, StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        event_by_id(&tx, event_id)?;
        let rows = tasks_of_event(&tx, event_id)?;
        drop(tx);

        let chain = TaskChain::from_links(rows.iter().map(|row| {
            (
                row.task_id,
                ChainLinks::new(row.prev_task_id, row.next_task_id),
            )
        }));
        let rows: BTreeMap<TaskId, TaskRow> =
            rows.into_iter().map(|row| (row.task_id, row)).collect();
        debug!(event_id = event_id.get(), tasks = rows.len(), "task sequence loaded");

        Ok(TaskSequence {
            event_id,
            chain,
            rows,
        })
    }

    /// The whole sequence collected, or the first fault.
    pub fn ordered_tasks(&self, event_id: EventId) -> Result<Vec<TaskRow>, StoreError> {
        self.task_sequence(event_id)?
            .iter()
            .map(|row| row.cloned())
            .collect()
    }
}
