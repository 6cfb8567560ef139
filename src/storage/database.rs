//! Persistent key-value store keyed by [`Hash`], backed by RocksDB.
//!
//! A `Database` starts closed. `open` connects it to a directory, replacing any previous
//! connection; every other operation fails with [`DatabaseError::NotOpen`] until then.

use crate::config::DatabaseConfig;
use crate::types::codec;
use crate::types::hash::Hash;
use crate::types::reader::{Decode, DecodeError};
use crate::types::writer::{Encode, EncodeError};
use crate::{debug, error, info};
use chasm_derive::Error;
use rocksdb::{DB, Options, WriteOptions};
use std::path::{Path, PathBuf};

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("database is not open")]
    NotOpen,

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("cannot encode value: {0}")]
    Encode(EncodeError),

    /// The key exists but its bytes do not decode as the requested type.
    #[error("record {key} is corrupted: {source}")]
    Corrupted { key: Hash, source: DecodeError },
}

impl From<rocksdb::Error> for DatabaseError {
    fn from(e: rocksdb::Error) -> Self {
        DatabaseError::Backend(e.into_string())
    }
}

impl From<EncodeError> for DatabaseError {
    fn from(e: EncodeError) -> Self {
        DatabaseError::Encode(e)
    }
}

struct Connection {
    db: DB,
    path: PathBuf,
    sync_writes: bool,
}

/// Key-value store with an explicit open/close lifecycle.
#[derive(Default)]
pub struct Database {
    conn: Option<Connection>,
}

impl Database {
    /// Creates a closed store.
    pub fn new() -> Self {
        Self { conn: None }
    }

    /// Opens `path` with default options, creating it if missing.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<(), DatabaseError> {
        self.open_with(&DatabaseConfig::new(path.as_ref()))
    }

    /// Opens the store described by `config`.
    ///
    /// An existing connection is closed first, even if the new open fails.
    pub fn open_with(&mut self, config: &DatabaseConfig) -> Result<(), DatabaseError> {
        self.close();

        let mut opts = Options::default();
        opts.create_if_missing(config.create_if_missing);

        let db = DB::open(&opts, &config.path).inspect_err(|e| {
            error!("failed to open database at {}: {}", config.path.display(), e);
        })?;

        info!("opened database at {}", config.path.display());
        self.conn = Some(Connection {
            db,
            path: config.path.clone(),
            sync_writes: config.sync_writes,
        });
        Ok(())
    }

    /// Closes the connection. Does nothing if already closed.
    pub fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            info!("closed database at {}", conn.path.display());
        }
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Directory of the current connection.
    pub fn path(&self) -> Option<&Path> {
        self.conn.as_ref().map(|c| c.path.as_path())
    }

    fn conn(&self) -> Result<&Connection, DatabaseError> {
        self.conn.as_ref().ok_or(DatabaseError::NotOpen)
    }

    fn write_options(conn: &Connection) -> WriteOptions {
        let mut opts = WriteOptions::default();
        opts.set_sync(conn.sync_writes);
        opts
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn put(&self, key: &Hash, value: &[u8]) -> Result<(), DatabaseError> {
        let conn = self.conn()?;
        conn.db.put_opt(key.as_slice(), value, &Self::write_options(conn))?;
        debug!("put {} ({} bytes)", key, value.len());
        Ok(())
    }

    /// Returns the bytes stored under `key`, `None` if absent.
    pub fn get(&self, key: &Hash) -> Result<Option<Vec<u8>>, DatabaseError> {
        Ok(self.conn()?.db.get(key.as_slice())?)
    }

    /// Removes `key`. Removing an absent key is not an error.
    pub fn delete(&self, key: &Hash) -> Result<(), DatabaseError> {
        let conn = self.conn()?;
        conn.db.delete_opt(key.as_slice(), &Self::write_options(conn))?;
        debug!("deleted {}", key);
        Ok(())
    }

    /// Encodes `value` and stores it under `key`.
    pub fn put_value<T: Encode + ?Sized>(&self, key: &Hash, value: &T) -> Result<(), DatabaseError> {
        let bytes = codec::encode(value)?;
        self.put(key, &bytes)
    }

    /// Reads and decodes the value under `key`.
    ///
    /// `Ok(None)` when the key is absent, [`DatabaseError::Corrupted`] when it is present
    /// but does not decode as `T`.
    pub fn get_value<T: Decode>(&self, key: &Hash) -> Result<Option<T>, DatabaseError> {
        let Some(bytes) = self.get(key)? else {
            return Ok(None);
        };

        codec::decode(&bytes).map(Some).map_err(|source| {
            error!("record {} failed to decode: {}", key, source);
            DatabaseError::Corrupted { key: *key, source }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::block::{Block, Header};
    use crate::utils::test_utils::utils::{mining_transaction, random_hash, signed};
    use tempfile::TempDir;

    fn open_temp() -> (Database, TempDir) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let mut db = Database::new();
        db.open(dir.path()).expect("failed to open db");
        (db, dir)
    }

    #[test]
    fn new_database_is_closed() {
        let db = Database::new();
        assert!(!db.is_open());
        assert!(db.path().is_none());
        assert!(matches!(db.get(&Hash::zero()), Err(DatabaseError::NotOpen)));
        assert!(matches!(db.put(&Hash::zero(), b"x"), Err(DatabaseError::NotOpen)));
        assert!(matches!(db.delete(&Hash::zero()), Err(DatabaseError::NotOpen)));
    }

    #[test]
    fn put_get_delete() {
        let (db, _dir) = open_temp();
        let key = random_hash();

        assert_eq!(db.get(&key).unwrap(), None);
        db.put(&key, b"value").unwrap();
        assert_eq!(db.get(&key).unwrap(), Some(b"value".to_vec()));

        db.put(&key, b"other").unwrap();
        assert_eq!(db.get(&key).unwrap(), Some(b"other".to_vec()));

        db.delete(&key).unwrap();
        assert_eq!(db.get(&key).unwrap(), None);
        db.delete(&key).unwrap();
    }

    #[test]
    fn close_then_operations_fail() {
        let (mut db, _dir) = open_temp();
        db.close();
        assert!(!db.is_open());
        assert!(matches!(db.get(&Hash::zero()), Err(DatabaseError::NotOpen)));
        db.close();
    }

    #[test]
    fn data_survives_reopen() {
        let (mut db, dir) = open_temp();
        let key = random_hash();
        db.put(&key, &[1, 2, 3]).unwrap();
        db.close();

        db.open(dir.path()).unwrap();
        assert_eq!(db.get(&key).unwrap(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn open_replaces_current_connection() {
        let (mut db, first) = open_temp();
        let second = tempfile::tempdir().unwrap();
        let key = random_hash();
        db.put(&key, b"first").unwrap();

        db.open(second.path()).unwrap();
        assert_eq!(db.path(), Some(second.path()));
        assert_eq!(db.get(&key).unwrap(), None);

        db.open(first.path()).unwrap();
        assert_eq!(db.get(&key).unwrap(), Some(b"first".to_vec()));
    }

    #[test]
    fn open_without_create_fails_on_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig::new(dir.path().join("missing")).create_if_missing(false);
        let mut db = Database::new();
        assert!(matches!(db.open_with(&config), Err(DatabaseError::Backend(_))));
        assert!(!db.is_open());
    }

    #[test]
    fn unsynced_writes_are_readable() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = Database::new();
        db.open_with(&DatabaseConfig::new(dir.path()).sync_writes(false))
            .unwrap();
        let key = random_hash();
        db.put(&key, b"fast").unwrap();
        assert_eq!(db.get(&key).unwrap(), Some(b"fast".to_vec()));
    }

    #[test]
    fn typed_values_round_trip() {
        let (db, _dir) = open_temp();
        let block = Block::new(random_hash(), 1, 2, 3, vec![signed(mining_transaction(50))]).unwrap();
        let key = block.hash().unwrap();

        db.put_value(&key, &block).unwrap();
        assert_eq!(db.get_value::<Block>(&key).unwrap(), Some(block));
        assert_eq!(db.get_value::<Block>(&random_hash()).unwrap(), None);
    }

    #[test]
    fn undecodable_record_is_corrupted_not_missing() {
        let (db, _dir) = open_temp();
        let key = random_hash();
        db.put(&key, &[0x42, 0x00]).unwrap();

        match db.get_value::<Header>(&key) {
            Err(DatabaseError::Corrupted { key: k, source }) => {
                assert_eq!(k, key);
                assert!(matches!(source, DecodeError::TagMismatch { .. }));
            }
            other => panic!("expected corruption, got {other:?}"),
        }
    }

    #[test]
    fn error_source_chain() {
        use std::error::Error as _;
        let err = DatabaseError::Corrupted {
            key: Hash::zero(),
            source: DecodeError::TrailingData { remaining: 2 },
        };
        assert!(err.source().is_some());
        assert!(DatabaseError::NotOpen.source().is_none());
    }
}
