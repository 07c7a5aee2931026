#![forbid(unsafe_code)]

use super::events::event_by_id;
use super::suppliers::{contract_by_id, ensure_contract_covers, supplier_by_id};
use super::*;
use ec_core::{EntityKind, EventId, ListId, Money, SupplierId};
use rusqlite::{OptionalExtension, params};
use tracing::{debug, info};

impl SqliteStore {
    /// Attaches a supplier to an event and freezes the supplier name, payment terms and
    /// contract total as they are right now.
    pub fn engage(&mut self, request: NewEngagement) -> Result<EngagementRow, StoreError> {
        let NewEngagement {
            event_id,
            supplier_id,
            contract_id,
            agreed_price,
        } = request;
        if agreed_price.is_negative() {
            return Err(StoreError::InvalidInput("agreed_price must be >= 0"));
        }

        let now_ms = now_ms();
        let tx = begin_write(&mut self.conn)?;
        let event = event_by_id(&tx, event_id)?;
        let supplier = supplier_by_id(&tx, supplier_id)?;
        if !supplier.is_active {
            return Err(StoreError::InvalidInput("supplier is inactive"));
        }
        if engagement_for_pair(&tx, event_id, supplier_id)?.is_some() {
            return Err(StoreError::DuplicateEngagement {
                event_id,
                supplier_id,
            });
        }

        let contract = contract_id
            .map(|contract_id| contract_by_id(&tx, contract_id))
            .transpose()?;
        if let Some(contract) = &contract {
            if contract.supplier_id != supplier_id {
                return Err(StoreError::InvalidReference {
                    entity: EntityKind::Contract,
                    id: contract.contract_id.get(),
                    owner: EntityKind::Supplier,
                    owner_id: supplier_id.get(),
                });
            }
            ensure_contract_covers(contract, event.event_date)?;
        }

        let insert = tx.execute(
            "INSERT INTO event_suppliers(event_id, supplier_id, contract_id, \
               supplier_name_snapshot, payment_terms_snapshot, contract_total_snapshot, \
               agreed_price, is_confirmed, confirmed_at_ms, created_at_ms, updated_at_ms) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, NULL, ?8, ?8)",
            params![
                event_id.get(),
                supplier_id.get(),
                contract_id.map(|id| id.get()),
                supplier.name,
                supplier.payment_terms,
                contract.as_ref().map(|contract| contract.total_price.minor()),
                agreed_price.minor(),
                now_ms
            ],
        );
        if let Err(err) = insert {
            if is_unique_violation(&err, "event_suppliers.event_id") {
                return Err(StoreError::DuplicateEngagement {
                    event_id,
                    supplier_id,
                });
            }
            return Err(err.into());
        }
        let list_id = ListId::new(tx.last_insert_rowid());
        let row = engagement_by_id(&tx, list_id)?;
        tx.commit()?;

        info!(
            list_id = list_id.get(),
            event_id = event_id.get(),
            supplier_id = supplier_id.get(),
            contract_id = ?contract_id.map(|id| id.get()),
            "supplier engaged"
        );
        Ok(row)
    }

    pub fn get_engagement(&self, list_id: ListId) -> Result<EngagementRow, StoreError> {
        engagement_by_id(&self.conn, list_id)
    }

    pub fn list_engagements(&self, event_id: EventId) -> Result<Vec<EngagementRow>, StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        event_by_id(&tx, event_id)?;
        let mut stmt = tx.prepare(&format!(
            "SELECT {ENGAGEMENT_COLUMNS} FROM event_suppliers WHERE event_id=?1 \
             ORDER BY list_id ASC"
        ))?;
        let rows = stmt
            .query_map(params![event_id.get()], engagement_row)?
            .collect::<Result<Vec<_>, _>>()?;
        debug!(event_id = event_id.get(), count = rows.len(), "engagements listed");
        Ok(rows)
    }

    /// Idempotent: confirming a confirmed engagement keeps its original confirmation time.
    pub fn confirm(&mut self, list_id: ListId) -> Result<EngagementRow, StoreError> {
        let tx = begin_write(&mut self.conn)?;
        let current = engagement_by_id(&tx, list_id)?;
        if current.is_confirmed {
            return Ok(current);
        }
        let now_ms = now_ms();
        tx.execute(
            "UPDATE event_suppliers SET is_confirmed=1, confirmed_at_ms=?2, updated_at_ms=?2 \
             WHERE list_id=?1",
            params![list_id.get(), now_ms],
        )?;
        let row = engagement_by_id(&tx, list_id)?;
        tx.commit()?;

        info!(list_id = list_id.get(), "engagement confirmed");
        Ok(row)
    }

    /// Unconfirming an unconfirmed engagement is a no-op.
    pub fn unconfirm(&mut self, list_id: ListId) -> Result<EngagementRow, StoreError> {
        let tx = begin_write(&mut self.conn)?;
        let current = engagement_by_id(&tx, list_id)?;
        if !current.is_confirmed {
            return Ok(current);
        }
        tx.execute(
            "UPDATE event_suppliers SET is_confirmed=0, confirmed_at_ms=NULL, updated_at_ms=?2 \
             WHERE list_id=?1",
            params![list_id.get(), now_ms()],
        )?;
        let row = engagement_by_id(&tx, list_id)?;
        tx.commit()?;

        info!(list_id = list_id.get(), "engagement unconfirmed");
        Ok(row)
    }

    /// Renegotiates the agreed price of an unconfirmed engagement. Snapshot fields stay put.
    pub fn update_agreed_price(
        &mut self,
        list_id: ListId,
        agreed_price: Money,
    ) -> Result<EngagementRow, StoreError> {
        if agreed_price.is_negative() {
            return Err(StoreError::InvalidInput("agreed_price must be >= 0"));
        }

        let tx = begin_write(&mut self.conn)?;
        let current = engagement_by_id(&tx, list_id)?;
        if current.is_confirmed {
            return Err(StoreError::InvalidInput(
                "confirmed engagement cannot be repriced; unconfirm it first",
            ));
        }
        tx.execute(
            "UPDATE event_suppliers SET agreed_price=?2, updated_at_ms=?3 WHERE list_id=?1",
            params![list_id.get(), agreed_price.minor(), now_ms()],
        )?;
        let row = engagement_by_id(&tx, list_id)?;
        tx.commit()?;

        info!(list_id = list_id.get(), agreed_price = %agreed_price, "engagement repriced");
        Ok(row)
    }

    pub fn disengage(&mut self, list_id: ListId) -> Result<(), StoreError> {
        let tx = begin_write(&mut self.conn)?;
        let current = engagement_by_id(&tx, list_id)?;
        if current.is_confirmed {
            return Err(StoreError::InvalidInput(
                "confirmed engagement cannot be removed; unconfirm it first",
            ));
        }
        tx.execute(
            "DELETE FROM event_suppliers WHERE list_id=?1",
            params![list_id.get()],
        )?;
        tx.commit()?;

        info!(
            list_id = list_id.get(),
            event_id = current.event_id.get(),
            supplier_id = current.supplier_id.get(),
            "supplier disengaged"
        );
        Ok(())
    }
}

fn engagement_for_pair(
    conn: &Connection,
    event_id: EventId,
    supplier_id: SupplierId,
) -> Result<Option<ListId>, StoreError> {
    Ok(conn
        .query_row(
            "SELECT list_id FROM event_suppliers WHERE event_id=?1 AND supplier_id=?2",
            params![event_id.get(), supplier_id.get()],
            |row| row.get::<_, i64>(0),
        )
        .optional()?
        .map(ListId::new))
}

fn engagement_by_id(conn: &Connection, list_id: ListId) -> Result<EngagementRow, StoreError> {
    conn.query_row(
        &format!("SELECT {ENGAGEMENT_COLUMNS} FROM event_suppliers WHERE list_id=?1"),
        params![list_id.get()],
        engagement_row,
    )
    .optional()?
    .ok_or(StoreError::not_found(EntityKind::Engagement, list_id.get()))
}
