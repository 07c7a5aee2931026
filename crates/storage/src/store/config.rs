#![forbid(unsafe_code)]

use super::StoreError;
use std::time::Duration;

pub const DB_FILE_ENV: &str = "EVENTCHAIN_DB_FILE";
pub const BUSY_TIMEOUT_ENV: &str = "EVENTCHAIN_BUSY_TIMEOUT_MS";
pub const SEED_LOOKUPS_ENV: &str = "EVENTCHAIN_SEED_LOOKUPS";

const DEFAULT_DB_FILE: &str = "eventchain.db";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_file_name: String,
    pub busy_timeout: Duration,
    pub seed_lookups: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_file_name: DEFAULT_DB_FILE.to_string(),
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
            seed_lookups: true,
        }
    }
}

impl StoreConfig {
    /// Defaults overridden by `EVENTCHAIN_*` variables that are set.
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, StoreError> {
        let mut config = Self::default();

        if let Some(raw) = get(DB_FILE_ENV) {
            let name = raw.trim();
            if name.is_empty() || name.contains('/') || name.contains('\\') {
                return Err(StoreError::InvalidInput(
                    "EVENTCHAIN_DB_FILE must be a bare file name",
                ));
            }
            config.db_file_name = name.to_string();
        }

        if let Some(raw) = get(BUSY_TIMEOUT_ENV) {
            let ms = raw.trim().parse::<u64>().map_err(|_| {
                StoreError::InvalidInput("EVENTCHAIN_BUSY_TIMEOUT_MS must be an integer")
            })?;
            config.busy_timeout = Duration::from_millis(ms);
        }

        if let Some(raw) = get(SEED_LOOKUPS_ENV) {
            config.seed_lookups = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(StoreError::InvalidInput(
                        "EVENTCHAIN_SEED_LOOKUPS must be a boolean",
                    ));
                }
            };
        }

        Ok(config)
    }
}
