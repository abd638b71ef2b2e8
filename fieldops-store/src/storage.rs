//! redb-based persistent key-value layer
//!
//! One `kv` table mapping string keys to JSON documents. Every write is a
//! whole-value overwrite inside a committed transaction, so a key is always
//! either absent or holds one complete document; partial corruption is
//! structurally impossible at this boundary.
//!
//! Recovery rule: stored bytes that fail JSON decoding are logged at `warn`
//! level and reported as absent. The caller falls back to its defaults
//! instead of crashing.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Key-value table: key = logical name, value = JSON document bytes
const KV_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("kv");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Durable key-value store backed by redb
///
/// Commits are persistent as soon as `commit()` returns (copy-on-write with
/// atomic pointer swap), so the file stays consistent across hard shutdowns.
#[derive(Clone)]
pub struct KvStore {
    db: Arc<Database>,
}

impl KvStore {
    /// Open or create the database file at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (tests and ephemeral sessions)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(KV_TABLE)?;
        }
        write_txn.commit()?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Read and decode the value under `key`.
    ///
    /// Returns `None` for a key never written. Undecodable content is
    /// also reported as `None`, with a `warn` log (recover-as-absent rule).
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(KV_TABLE)?;
        let Some(guard) = table.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_slice(guard.value()) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                tracing::warn!(key, error = %err, "stored value is not valid JSON, treating as absent");
                Ok(None)
            }
        }
    }

    /// Overwrite the value under `key` with one JSON document
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> StorageResult<()> {
        let bytes = serde_json::to_vec(value)?;
        self.set_many(&[(key, bytes)])
    }

    /// Overwrite several keys in one committed transaction.
    ///
    /// Used where two collections must change together (technician removal,
    /// seeding, backup import): either all writes land or none do.
    pub fn set_many(&self, entries: &[(&str, Vec<u8>)]) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(KV_TABLE)?;
            for (key, bytes) in entries {
                table.insert(*key, bytes.as_slice())?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Remove `key`; returns whether it was present
    pub fn remove(&self, key: &str) -> StorageResult<bool> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(KV_TABLE)?;
            table.remove(key)?.is_some()
        };
        write_txn.commit()?;
        Ok(removed)
    }

    /// Whether `key` has ever been written (absent vs. empty distinction)
    pub fn contains(&self, key: &str) -> StorageResult<bool> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(KV_TABLE)?;
        Ok(table.get(key)?.is_some())
    }

    /// Write raw bytes under `key` without JSON validation (tests)
    #[cfg(test)]
    pub(crate) fn set_raw(&self, key: &str, bytes: &[u8]) -> StorageResult<()> {
        self.set_many(&[(key, bytes.to_vec())])
    }
}

impl std::fmt::Debug for KvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_on_unwritten_key_is_absent() {
        let kv = KvStore::open_in_memory().unwrap();
        let value: Option<Vec<String>> = kv.get("customers").unwrap();
        assert!(value.is_none());
        assert!(!kv.contains("customers").unwrap());
    }

    #[test]
    fn absent_differs_from_empty() {
        let kv = KvStore::open_in_memory().unwrap();
        kv.set("orders", &Vec::<String>::new()).unwrap();
        assert!(kv.contains("orders").unwrap());
        let value: Option<Vec<String>> = kv.get("orders").unwrap();
        assert_eq!(value, Some(vec![]));
    }

    #[test]
    fn set_fully_overwrites() {
        let kv = KvStore::open_in_memory().unwrap();
        kv.set("k", &vec!["a", "b"]).unwrap();
        kv.set("k", &vec!["c"]).unwrap();
        let value: Option<Vec<String>> = kv.get("k").unwrap();
        assert_eq!(value, Some(vec!["c".to_string()]));
    }

    #[test]
    fn malformed_json_recovers_as_absent() {
        let kv = KvStore::open_in_memory().unwrap();
        kv.set_raw("settings", b"{not json").unwrap();
        let value: Option<serde_json::Value> = kv.get("settings").unwrap();
        assert!(value.is_none());
        // the key itself is still there
        assert!(kv.contains("settings").unwrap());
    }

    #[test]
    fn remove_reports_presence() {
        let kv = KvStore::open_in_memory().unwrap();
        kv.set("k", &1u32).unwrap();
        assert!(kv.remove("k").unwrap());
        assert!(!kv.remove("k").unwrap());
        assert!(!kv.contains("k").unwrap());
    }

    #[test]
    fn set_many_commits_together() {
        let kv = KvStore::open_in_memory().unwrap();
        let a = serde_json::to_vec(&vec!["x"]).unwrap();
        let b = serde_json::to_vec(&vec!["y"]).unwrap();
        kv.set_many(&[("a", a), ("b", b)]).unwrap();
        let a: Option<Vec<String>> = kv.get("a").unwrap();
        let b: Option<Vec<String>> = kv.get("b").unwrap();
        assert_eq!(a, Some(vec!["x".to_string()]));
        assert_eq!(b, Some(vec!["y".to_string()]));
    }

    #[test]
    fn survives_reopen_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kv.redb");
        {
            let kv = KvStore::open(&path).unwrap();
            kv.set("customers", &vec!["acme"]).unwrap();
        }
        let kv = KvStore::open(&path).unwrap();
        let value: Option<Vec<String>> = kv.get("customers").unwrap();
        assert_eq!(value, Some(vec!["acme".to_string()]));
    }
}
