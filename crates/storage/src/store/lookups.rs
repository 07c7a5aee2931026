#![forbid(unsafe_code)]

use super::*;
use ec_core::{LookupDomain, LookupEntry};
use rusqlite::params;
use tracing::{debug, info};

impl SqliteStore {
    /// The registry loaded at open (or at the last administrative change). Cheap to clone and
    /// safe to keep across calls; it never changes under a caller.
    pub fn lookups(&self) -> Arc<LookupRegistry> {
        Arc::clone(&self.lookups)
    }

    pub fn active_entries(&self, domain: LookupDomain) -> Vec<LookupEntry> {
        self.lookups
            .active_entries(domain)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn is_active(&self, domain: LookupDomain, code: &str) -> bool {
        self.lookups.is_active(domain, code)
    }

    /// Inserts or replaces one code. Codes are stored upper-case.
    pub fn lookup_upsert(&mut self, entry: LookupEntry) -> Result<i64, StoreError> {
        let code = entry.code.trim().to_ascii_uppercase();
        if code.is_empty() {
            return Err(StoreError::InvalidInput("lookup code must not be empty"));
        }
        let label = entry.label.trim();
        if label.is_empty() {
            return Err(StoreError::InvalidInput("lookup label must not be empty"));
        }

        let tx = begin_write(&mut self.conn)?;
        tx.execute(
            "INSERT INTO lookup_values(domain, code, label, sort_order, is_active) \
             VALUES (?1, ?2, ?3, ?4, ?5) \
             ON CONFLICT(domain, code) DO UPDATE SET \
               label=excluded.label, sort_order=excluded.sort_order, is_active=excluded.is_active",
            params![entry.domain.as_str(), code, label, entry.sort_order, entry.active],
        )?;
        let version = bump_lookup_version_tx(&tx, now_ms())?;
        tx.commit()?;

        info!(domain = %entry.domain, code = %code, version, "lookup code upserted");
        self.refresh_lookups()?;
        Ok(version)
    }

    pub fn lookup_set_active(
        &mut self,
        domain: LookupDomain,
        code: &str,
        active: bool,
    ) -> Result<i64, StoreError> {
        let code = code.trim().to_ascii_uppercase();
        let tx = begin_write(&mut self.conn)?;
        let updated = tx.execute(
            "UPDATE lookup_values SET is_active=?3 WHERE domain=?1 AND code=?2",
            params![domain.as_str(), code, active],
        )?;
        if updated == 0 {
            return Err(StoreError::UnknownCode { domain, code });
        }
        let version = bump_lookup_version_tx(&tx, now_ms())?;
        tx.commit()?;

        info!(domain = %domain, code = %code, active, version, "lookup code toggled");
        self.refresh_lookups()?;
        Ok(version)
    }

    /// Reloads the registry from disk, picking up changes made through other stores.
    pub fn refresh_lookups(&mut self) -> Result<Arc<LookupRegistry>, StoreError> {
        let registry = load_registry(&self.conn)?;
        debug!(
            version = registry.version(),
            entries = registry.len(),
            "lookup registry loaded"
        );
        self.lookups = Arc::new(registry);
        Ok(self.lookups())
    }
}
