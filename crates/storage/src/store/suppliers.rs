#![forbid(unsafe_code)]

use super::*;
use ec_core::{ContractId, EntityKind, LookupDomain, Money, SupplierId};
use rusqlite::{OptionalExtension, params};
use time::Date;
use tracing::{debug, info};

impl SqliteStore {
    pub fn create_supplier(&mut self, request: NewSupplier) -> Result<SupplierRow, StoreError> {
        let name = supplier_name(&request.name)?;
        let supplier_type =
            require_code(&self.lookups, LookupDomain::SupplierType, &request.supplier_type)?;
        let payment_terms = require_optional_code(
            &self.lookups,
            LookupDomain::PaymentTerms,
            request.payment_terms.as_deref(),
        )?;

        let now_ms = now_ms();
        let tx = begin_write(&mut self.conn)?;
        let insert = tx.execute(
            "INSERT INTO suppliers(name, supplier_type, payment_terms, is_active, created_at_ms, \
             updated_at_ms) VALUES (?1, ?2, ?3, 1, ?4, ?4)",
            params![name, supplier_type, payment_terms, now_ms],
        );
        if let Err(err) = insert {
            return Err(map_supplier_name_conflict(err));
        }
        let supplier_id = SupplierId::new(tx.last_insert_rowid());
        let row = supplier_by_id(&tx, supplier_id)?;
        tx.commit()?;

        info!(supplier_id = supplier_id.get(), name = %row.name, "supplier created");
        Ok(row)
    }

    pub fn get_supplier(&self, supplier_id: SupplierId) -> Result<SupplierRow, StoreError> {
        supplier_by_id(&self.conn, supplier_id)
    }

    pub fn list_suppliers(&self, active_only: bool) -> Result<Vec<SupplierRow>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers \
             WHERE (?1 = 0 OR is_active = 1) \
             ORDER BY name ASC, supplier_id ASC"
        ))?;
        let rows = stmt
            .query_map(params![active_only], supplier_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Edits live master data only. Engagement snapshots taken earlier keep the old values.
    pub fn update_supplier(
        &mut self,
        supplier_id: SupplierId,
        update: SupplierUpdate,
    ) -> Result<SupplierRow, StoreError> {
        let name = update.name.as_deref().map(supplier_name).transpose()?;
        let supplier_type = update
            .supplier_type
            .as_deref()
            .map(|code| require_code(&self.lookups, LookupDomain::SupplierType, code))
            .transpose()?;
        let payment_terms = update
            .payment_terms
            .map(|terms| {
                require_optional_code(&self.lookups, LookupDomain::PaymentTerms, terms.as_deref())
            })
            .transpose()?;

        let tx = begin_write(&mut self.conn)?;
        let current = supplier_by_id(&tx, supplier_id)?;
        let name = name.unwrap_or(current.name);
        let supplier_type = supplier_type.unwrap_or(current.supplier_type);
        let payment_terms = payment_terms.unwrap_or(current.payment_terms);

        let update = tx.execute(
            "UPDATE suppliers SET name=?2, supplier_type=?3, payment_terms=?4, updated_at_ms=?5 \
             WHERE supplier_id=?1",
            params![supplier_id.get(), name, supplier_type, payment_terms, now_ms()],
        );
        if let Err(err) = update {
            return Err(map_supplier_name_conflict(err));
        }
        let row = supplier_by_id(&tx, supplier_id)?;
        tx.commit()?;

        info!(supplier_id = supplier_id.get(), "supplier updated");
        Ok(row)
    }

    /// Deactivated suppliers stay referenced by history but cannot be engaged again.
    pub fn set_supplier_active(
        &mut self,
        supplier_id: SupplierId,
        active: bool,
    ) -> Result<SupplierRow, StoreError> {
        let tx = begin_write(&mut self.conn)?;
        let updated = tx.execute(
            "UPDATE suppliers SET is_active=?2, updated_at_ms=?3 WHERE supplier_id=?1",
            params![supplier_id.get(), active, now_ms()],
        )?;
        if updated == 0 {
            return Err(StoreError::not_found(EntityKind::Supplier, supplier_id.get()));
        }
        let row = supplier_by_id(&tx, supplier_id)?;
        tx.commit()?;

        info!(supplier_id = supplier_id.get(), active, "supplier activity changed");
        Ok(row)
    }

    /// Refused while any contract or engagement references the supplier.
    pub fn delete_supplier(&mut self, supplier_id: SupplierId) -> Result<(), StoreError> {
        let tx = begin_write(&mut self.conn)?;
        supplier_by_id(&tx, supplier_id)?;

        for table in ["contracts", "event_suppliers"] {
            let references = tx.query_row(
                &format!("SELECT COUNT(1) FROM {table} WHERE supplier_id=?1"),
                params![supplier_id.get()],
                |row| row.get::<_, i64>(0),
            )?;
            if references > 0 {
                return Err(StoreError::ReferencedEntity {
                    entity: EntityKind::Supplier,
                    id: supplier_id.get(),
                    referenced_by: table,
                });
            }
        }

        let delete = tx.execute(
            "DELETE FROM suppliers WHERE supplier_id=?1",
            params![supplier_id.get()],
        );
        if let Err(err) = delete {
            if is_foreign_key_violation(&err) {
                return Err(StoreError::ReferencedEntity {
                    entity: EntityKind::Supplier,
                    id: supplier_id.get(),
                    referenced_by: "another table",
                });
            }
            return Err(err.into());
        }
        tx.commit()?;

        info!(supplier_id = supplier_id.get(), "supplier deleted");
        Ok(())
    }

    pub fn create_contract(&mut self, request: NewContract) -> Result<ContractRow, StoreError> {
        if request
            .valid_to
            .is_some_and(|valid_to| valid_to < request.valid_from)
        {
            return Err(StoreError::InvalidInput("valid_to must be >= valid_from"));
        }
        if request.total_price.is_negative() {
            return Err(StoreError::InvalidInput("total_price must be >= 0"));
        }

        let now_ms = now_ms();
        let tx = begin_write(&mut self.conn)?;
        supplier_by_id(&tx, request.supplier_id)?;
        tx.execute(
            "INSERT INTO contracts(supplier_id, valid_from, valid_to, total_price, created_at_ms, \
             updated_at_ms) VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![
                request.supplier_id.get(),
                request.valid_from,
                request.valid_to,
                request.total_price.minor(),
                now_ms
            ],
        )?;
        let contract_id = ContractId::new(tx.last_insert_rowid());
        let row = contract_by_id(&tx, contract_id)?;
        tx.commit()?;

        info!(
            contract_id = contract_id.get(),
            supplier_id = request.supplier_id.get(),
            "contract created"
        );
        Ok(row)
    }

    pub fn get_contract(&self, contract_id: ContractId) -> Result<ContractRow, StoreError> {
        contract_by_id(&self.conn, contract_id)
    }

    /// Reprices a contract that no engagement has snapshotted yet.
    pub fn update_contract_price(
        &mut self,
        contract_id: ContractId,
        total_price: Money,
    ) -> Result<ContractRow, StoreError> {
        if total_price.is_negative() {
            return Err(StoreError::InvalidInput("total_price must be >= 0"));
        }

        let tx = begin_write(&mut self.conn)?;
        contract_by_id(&tx, contract_id)?;
        ensure_contract_unreferenced(&tx, contract_id)?;
        tx.execute(
            "UPDATE contracts SET total_price=?2, updated_at_ms=?3 WHERE contract_id=?1",
            params![contract_id.get(), total_price.minor(), now_ms()],
        )?;
        let row = contract_by_id(&tx, contract_id)?;
        tx.commit()?;

        info!(contract_id = contract_id.get(), total_price = %total_price, "contract repriced");
        Ok(row)
    }

    pub fn delete_contract(&mut self, contract_id: ContractId) -> Result<(), StoreError> {
        let tx = begin_write(&mut self.conn)?;
        contract_by_id(&tx, contract_id)?;
        ensure_contract_unreferenced(&tx, contract_id)?;
        tx.execute(
            "DELETE FROM contracts WHERE contract_id=?1",
            params![contract_id.get()],
        )?;
        tx.commit()?;

        info!(contract_id = contract_id.get(), "contract deleted");
        Ok(())
    }

    /// Fails with `ContractExpired` unless `as_of` lies in `[valid_from, valid_to]`; an
    /// absent `valid_to` never expires.
    pub fn validate_contract_window(
        &self,
        contract_id: ContractId,
        as_of: Date,
    ) -> Result<ContractRow, StoreError> {
        let contract = contract_by_id(&self.conn, contract_id)?;
        ensure_contract_covers(&contract, as_of)?;
        debug!(contract_id = contract_id.get(), %as_of, "contract window valid");
        Ok(contract)
    }
}

fn supplier_name(raw: &str) -> Result<String, StoreError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(StoreError::InvalidInput("supplier name must not be empty"));
    }
    Ok(name.to_string())
}

fn map_supplier_name_conflict(err: rusqlite::Error) -> StoreError {
    if is_unique_violation(&err, "suppliers.name") {
        return StoreError::InvalidInput("supplier name already exists");
    }
    StoreError::Sql(err)
}

fn ensure_contract_unreferenced(
    conn: &Connection,
    contract_id: ContractId,
) -> Result<(), StoreError> {
    let references = conn.query_row(
        "SELECT COUNT(1) FROM event_suppliers WHERE contract_id=?1",
        params![contract_id.get()],
        |row| row.get::<_, i64>(0),
    )?;
    if references > 0 {
        return Err(StoreError::ReferencedEntity {
            entity: EntityKind::Contract,
            id: contract_id.get(),
            referenced_by: "event_suppliers",
        });
    }
    Ok(())
}

pub(super) fn ensure_contract_covers(
    contract: &ContractRow,
    as_of: Date,
) -> Result<(), StoreError> {
    if contract.covers(as_of) {
        return Ok(());
    }
    Err(StoreError::ContractExpired {
        contract_id: contract.contract_id,
        as_of,
        valid_from: contract.valid_from,
        valid_to: contract.valid_to,
    })
}

pub(super) fn supplier_by_id(
    conn: &Connection,
    supplier_id: SupplierId,
) -> Result<SupplierRow, StoreError> {
    conn.query_row(
        &format!("SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE supplier_id=?1"),
        params![supplier_id.get()],
        supplier_row,
    )
    .optional()?
    .ok_or(StoreError::not_found(EntityKind::Supplier, supplier_id.get()))
}

pub(super) fn contract_by_id(
    conn: &Connection,
    contract_id: ContractId,
) -> Result<ContractRow, StoreError> {
    conn.query_row(
        &format!("SELECT {CONTRACT_COLUMNS} FROM contracts WHERE contract_id=?1"),
        params![contract_id.get()],
        contract_row,
    )
    .optional()?
    .ok_or(StoreError::not_found(EntityKind::Contract, contract_id.get()))
}
