#![forbid(unsafe_code)]

use super::super::events::event_by_id;
use super::super::*;
use ec_core::{ChainFault, EventId, TaskId};
use rusqlite::params;
use std::collections::BTreeMap;
use tracing::{debug, warn};

impl SqliteStore {
    /// Checks the stored chain of `event_id`: one head, one tail, every task visited once.
    /// Returns the number of tasks.
    pub fn verify_chain(&self, event_id: EventId) -> Result<usize, StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        event_by_id(&tx, event_id)?;
        let chain = load_verified_chain(&tx, event_id)?;
        debug!(event_id = event_id.get(), len = chain.len(), "task chain verified");
        Ok(chain.len())
    }

    /// Stitches a chain broken by out-of-band deletes back together. Fragments are joined
    /// in the creation order of their head tasks. Closed loops and inconsistent pointers are
    /// left for manual repair.
    pub fn repair_chain(&mut self, event_id: EventId) -> Result<ChainRepair, StoreError> {
        let tx = begin_write(&mut self.conn)?;
        event_by_id(&tx, event_id)?;
        let before = load_chain(&tx, event_id)?;
        if before.verify().is_ok() {
            return Ok(ChainRepair {
                fragments: usize::from(!before.is_empty()),
                relinked: 0,
            });
        }

        let corrupted = |fault: ChainFault| {
            warn!(event_id = event_id.get(), fault = %fault, "task chain cannot be repaired");
            StoreError::ChainCorrupted { event_id, fault }
        };
        let fragments = before.fragments().map_err(corrupted)?.len();
        let created = creation_order(&tx, event_id)?;
        let repaired = before
            .repaired_by(|head| (created.get(&head).copied().unwrap_or(i64::MAX), head))
            .map_err(corrupted)?;
        let relinked = persist_chain_tx(&tx, &before, &repaired, None, now_ms())?;
        tx.commit()?;

        warn!(
            event_id = event_id.get(),
            fragments,
            relinked,
            "task chain repaired"
        );
        Ok(ChainRepair {
            fragments,
            relinked,
        })
    }
}

fn creation_order(
    conn: &Connection,
    event_id: EventId,
) -> Result<BTreeMap<TaskId, i64>, StoreError> {
    let mut stmt = conn.prepare("SELECT task_id, created_at_ms FROM tasks WHERE event_id=?1")?;
    let rows = stmt
        .query_map(params![event_id.get()], |row| {
            Ok((TaskId::new(row.get(0)?), row.get::<_, i64>(1)?))
        })?
        .collect::<Result<BTreeMap<_, _>, _>>()?;
    Ok(rows)
}
