#![forbid(unsafe_code)]

mod sql;

use super::super::StoreError;
use super::now_ms;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::BTreeSet;

pub(in crate::store) const SCHEMA_VERSION: i64 = 1;

/// Refuses databases this build cannot own: foreign tables, missing tables or another
/// schema version. An empty file passes.
pub(in crate::store) fn preflight_gate(conn: &Connection) -> Result<(), StoreError> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
    )?;
    let mut rows = stmt.query([])?;
    let mut tables = BTreeSet::new();
    while let Some(row) = rows.next()? {
        tables.insert(row.get::<_, String>(0)?);
    }

    if tables.is_empty() {
        return Ok(());
    }

    let required: BTreeSet<&str> = sql::REQUIRED_TABLES.iter().copied().collect();

    if tables
        .iter()
        .any(|table| !required.contains(table.as_str()))
    {
        return Err(StoreError::InvalidInput(
            "RESET_REQUIRED: unsupported tables detected",
        ));
    }

    if required.iter().any(|table| !tables.contains(*table)) {
        return Err(StoreError::InvalidInput(
            "RESET_REQUIRED: required table is missing",
        ));
    }

    let version = conn
        .query_row(
            "SELECT schema_version FROM schema_state WHERE singleton=1",
            [],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;

    match version {
        Some(v) if v == SCHEMA_VERSION => Ok(()),
        Some(_) => Err(StoreError::InvalidInput(
            "RESET_REQUIRED: schema version mismatch",
        )),
        None => Err(StoreError::InvalidInput(
            "RESET_REQUIRED: schema state row is missing",
        )),
    }
}

pub(in crate::store) fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    let now_ms = now_ms();
    conn.execute_batch(&sql::full_schema_sql())?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_state(singleton, schema_version, created_at_ms, \
         updated_at_ms) VALUES (1, ?1, ?2, ?2)",
        params![SCHEMA_VERSION, now_ms],
    )?;
    conn.execute(
        "INSERT OR IGNORE INTO lookup_state(singleton, version, updated_at_ms) VALUES (1, 0, ?1)",
        params![now_ms],
    )?;

    Ok(())
}
