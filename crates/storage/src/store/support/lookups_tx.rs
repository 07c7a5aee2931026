#![forbid(unsafe_code)]

use super::super::StoreError;
use ec_core::lookup::default_entries;
use ec_core::{LookupDomain, LookupEntry, LookupRegistry};
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use tracing::warn;

pub(in crate::store) fn load_registry(conn: &Connection) -> Result<LookupRegistry, StoreError> {
    let version = conn
        .query_row(
            "SELECT version FROM lookup_state WHERE singleton=1",
            [],
            |row| row.get::<_, i64>(0),
        )
        .optional()?
        .unwrap_or(0);

    let mut stmt =
        conn.prepare("SELECT domain, code, label, sort_order, is_active FROM lookup_values")?;
    let mut rows = stmt.query([])?;
    let mut entries = Vec::new();
    while let Some(row) = rows.next()? {
        let raw_domain = row.get::<_, String>(0)?;
        let Some(domain) = LookupDomain::parse(&raw_domain) else {
            warn!(domain = %raw_domain, "skipping lookup row of unknown domain");
            continue;
        };
        entries.push(LookupEntry {
            domain,
            code: row.get(1)?,
            label: row.get(2)?,
            sort_order: row.get(3)?,
            active: row.get(4)?,
        });
    }

    Ok(LookupRegistry::from_entries(version, entries))
}

/// Installs the default codes that are missing. Existing rows, including deactivated ones,
/// are left alone.
pub(in crate::store) fn seed_default_lookups_tx(
    tx: &Transaction<'_>,
    now_ms: i64,
) -> Result<usize, StoreError> {
    let mut inserted = 0usize;
    for entry in default_entries() {
        inserted += tx.execute(
            "INSERT OR IGNORE INTO lookup_values(domain, code, label, sort_order, is_active) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.domain.as_str(),
                entry.code,
                entry.label,
                entry.sort_order,
                entry.active
            ],
        )?;
    }
    if inserted > 0 {
        bump_lookup_version_tx(tx, now_ms)?;
    }
    Ok(inserted)
}

pub(in crate::store) fn bump_lookup_version_tx(
    tx: &Transaction<'_>,
    now_ms: i64,
) -> Result<i64, StoreError> {
    tx.execute(
        "UPDATE lookup_state SET version = version + 1, updated_at_ms = ?1 WHERE singleton=1",
        params![now_ms],
    )?;
    Ok(tx.query_row(
        "SELECT version FROM lookup_state WHERE singleton=1",
        [],
        |row| row.get::<_, i64>(0),
    )?)
}

/// Canonical (trimmed, upper-case) form of `code` if it is an active entry of `domain`.
pub(in crate::store) fn require_code(
    lookups: &LookupRegistry,
    domain: LookupDomain,
    code: &str,
) -> Result<String, StoreError> {
    let code = code.trim().to_ascii_uppercase();
    if lookups.is_active(domain, &code) {
        Ok(code)
    } else {
        Err(StoreError::UnknownCode { domain, code })
    }
}

pub(in crate::store) fn require_optional_code(
    lookups: &LookupRegistry,
    domain: LookupDomain,
    code: Option<&str>,
) -> Result<Option<String>, StoreError> {
    code.map(|code| require_code(lookups, domain, code))
        .transpose()
}
