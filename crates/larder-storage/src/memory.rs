//! In-memory storage backend for testing

use crate::codec::{self, TABLES};
use crate::error::{StorageError, StorageResult};
use crate::traits::StorageBackend;
use async_trait::async_trait;
use larder_core::{RecordSet, WriteBatch};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

type Tables = HashMap<&'static str, BTreeMap<String, Vec<u8>>>;

/// In-memory storage backend
///
/// Records are kept encoded, exactly as the on-disk backends keep them, so a
/// graph reopened over the same `MemoryStorage` goes through the same decode
/// path. Commits can be made to fail on demand with [`fail_commits`].
///
/// [`fail_commits`]: MemoryStorage::fail_commits
pub struct MemoryStorage {
    tables: RwLock<Tables>,
    fail_commits: AtomicBool,
    commits: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        let tables = TABLES.iter().map(|t| (*t, BTreeMap::new())).collect();
        Self {
            tables: RwLock::new(tables),
            fail_commits: AtomicBool::new(false),
            commits: AtomicUsize::new(0),
        }
    }

    /// Make every following commit fail until switched off again
    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    /// Number of successful commits so far
    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn initialize(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn close(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> StorageResult<bool> {
        Ok(true)
    }

    async fn load_records(&self) -> StorageResult<RecordSet> {
        let tables = self
            .tables
            .read()
            .map_err(|e| StorageError::Database(format!("Lock error: {}", e)))?;

        let mut records = RecordSet::new();
        for table in TABLES {
            if let Some(rows) = tables.get(table) {
                for (key, bytes) in rows {
                    codec::decode_into(&mut records, table, key, bytes)?;
                }
            }
        }
        Ok(records)
    }

    async fn commit(&self, batch: &WriteBatch) -> StorageResult<()> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(StorageError::Transaction(
                "commit refused by test switch".to_string(),
            ));
        }

        // Encode everything up front so a serialization failure leaves the
        // tables untouched.
        let encoded = batch
            .iter()
            .map(codec::encode)
            .collect::<StorageResult<Vec<_>>>()?;

        let mut tables = self
            .tables
            .write()
            .map_err(|e| StorageError::Database(format!("Lock error: {}", e)))?;
        for write in encoded {
            let rows = tables.entry(write.table).or_default();
            match write.value {
                Some(value) => {
                    rows.insert(write.key, value);
                }
                None => {
                    rows.remove(&write.key);
                }
            }
        }

        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
