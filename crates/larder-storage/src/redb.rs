//! ReDB storage backend

use crate::codec::{self, TABLES};
use crate::error::{StorageError, StorageResult};
use crate::traits::StorageBackend;
use async_trait::async_trait;
use larder_core::{RecordSet, WriteBatch};
use redb::{Database, ReadableTable, TableDefinition};
use std::path::Path;

type Table = TableDefinition<'static, &'static str, &'static [u8]>;

fn table(name: &'static str) -> Table {
    TableDefinition::new(name)
}

/// ReDB storage backend
///
/// One redb table per entity kind. A batch is committed in a single write
/// transaction, which redb aborts if it is dropped before `commit`.
pub struct RedbStorage {
    db: Database,
}

impl RedbStorage {
    /// Open or create a ReDB database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let db = Database::create(path).map_err(|e| StorageError::Database(e.to_string()))?;

        // Initialize tables
        let write_txn = db.begin_write()?;
        for name in TABLES {
            write_txn.open_table(table(name))?;
        }
        write_txn.commit()?;

        tracing::debug!("Opened redb store at {}", path.display());
        Ok(Self { db })
    }
}

#[async_trait]
impl StorageBackend for RedbStorage {
    fn name(&self) -> &'static str {
        "redb"
    }

    async fn initialize(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn close(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> StorageResult<bool> {
        let read_txn = self.db.begin_read()?;
        for name in TABLES {
            read_txn.open_table(table(name))?;
        }
        Ok(true)
    }

    async fn load_records(&self) -> StorageResult<RecordSet> {
        let read_txn = self.db.begin_read()?;
        let mut records = RecordSet::new();

        for name in TABLES {
            let rows = read_txn.open_table(table(name))?;
            for row in rows.iter()? {
                let (key, value) = row?;
                codec::decode_into(&mut records, name, key.value(), value.value())?;
            }
        }

        Ok(records)
    }

    async fn commit(&self, batch: &WriteBatch) -> StorageResult<()> {
        let encoded = batch
            .iter()
            .map(codec::encode)
            .collect::<StorageResult<Vec<_>>>()?;

        let write_txn = self.db.begin_write()?;
        for write in &encoded {
            let mut rows = write_txn.open_table(table(write.table))?;
            match &write.value {
                Some(value) => {
                    rows.insert(write.key.as_str(), value.as_slice())?;
                }
                None => {
                    rows.remove(write.key.as_str())?;
                }
            }
        }
        write_txn.commit()?;

        tracing::trace!("Committed {} writes to redb", encoded.len());
        Ok(())
    }
}
