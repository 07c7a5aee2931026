#![forbid(unsafe_code)]

mod config;
mod engagements;
mod error;
mod events;
mod lookups;
mod preferences;
mod requests;
mod suppliers;
mod support;
mod tasks;
mod types;
mod users;
mod venues;

pub use config::{BUSY_TIMEOUT_ENV, DB_FILE_ENV, SEED_LOOKUPS_ENV, StoreConfig};
pub use error::StoreError;
pub use requests::*;
pub use tasks::{TaskSequence, TaskSequenceIter};
pub use types::*;

use ec_core::LookupRegistry;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use support::*;
use tracing::{info, warn};

/// Durable home of every event-engine manager. One instance owns one SQLite connection;
/// several instances (or processes) may share the same database file.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    storage_dir: PathBuf,
    config: StoreConfig,
    lookups: Arc<LookupRegistry>,
}

impl SqliteStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open_with_config(storage_dir, StoreConfig::default())
    }

    pub fn open_with_config(
        storage_dir: impl AsRef<Path>,
        config: StoreConfig,
    ) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let db_path = storage_dir.join(&config.db_file_name);
        let mut conn = Connection::open(&db_path)?;
        conn.busy_timeout(config.busy_timeout)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        if let Err(err) = preflight_gate(&conn) {
            warn!(path = %db_path.display(), error = %err, "refusing to open database");
            return Err(err);
        }
        install_schema(&conn)?;

        if config.seed_lookups {
            let tx = begin_write(&mut conn)?;
            let seeded = seed_default_lookups_tx(&tx, now_ms())?;
            tx.commit()?;
            if seeded > 0 {
                info!(seeded, "seeded default lookup codes");
            }
        }

        let lookups = Arc::new(load_registry(&conn)?);
        info!(
            path = %db_path.display(),
            lookup_version = lookups.version(),
            "store opened"
        );

        Ok(Self {
            conn,
            storage_dir,
            config,
            lookups,
        })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

/// Write transactions take SQLite's write lock up front so two writers on the same event
/// serialize instead of failing at commit.
fn begin_write(conn: &mut Connection) -> Result<Transaction<'_>, StoreError> {
    Ok(conn.transaction_with_behavior(TransactionBehavior::Immediate)?)
}
