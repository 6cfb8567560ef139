//! Runtime configuration.
//!
//! Values come from code (builder setters) or from the environment:
//! - `CHASM_DB_PATH`: directory of the key-value store
//! - `CHASM_LOG`: minimum log level (`debug`, `info`, `warn`, `error`)

use crate::utils::log::Level;
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "chasm-db";
pub const DB_PATH_ENV: &str = "CHASM_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "CHASM_LOG";

/// Options for opening a [`Database`](crate::storage::database::Database).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Directory holding the store files.
    pub path: PathBuf,
    /// Whether to create the store if it doesn't exist.
    pub create_if_missing: bool,
    /// Whether puts and deletes wait for the write-ahead log to reach disk.
    pub sync_writes: bool,
}

impl DatabaseConfig {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            create_if_missing: true,
            sync_writes: true,
        }
    }

    #[must_use]
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    #[must_use]
    pub fn sync_writes(mut self, sync: bool) -> Self {
        self.sync_writes = sync;
        self
    }

    /// Reads `CHASM_DB_PATH`, falling back to [`DEFAULT_DB_PATH`].
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup(DB_PATH_ENV) {
            Some(path) if !path.is_empty() => Self::new(path),
            _ => Self::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_PATH)
    }
}

/// Log level requested through `CHASM_LOG`, if set and recognised.
pub fn log_level_from_env() -> Option<Level> {
    parse_log_level(std::env::var(LOG_LEVEL_ENV).ok().as_deref())
}

fn parse_log_level(value: Option<&str>) -> Option<Level> {
    value?.trim().parse().ok()
}
