//! SQLite storage backend

use crate::codec::{self, TABLES};
use crate::error::{StorageError, StorageResult};
use crate::traits::StorageBackend;
use async_trait::async_trait;
use larder_core::{RecordSet, WriteBatch};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open or create a SQLite database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let conn = Connection::open(path).map_err(|e| StorageError::Database(e.to_string()))?;
        Self::with_connection(conn)
    }

    /// Create an in-memory SQLite database (for testing)
    pub fn in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| StorageError::Database(e.to_string()))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> StorageResult<Self> {
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.init_tables()?;
        Ok(storage)
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StorageError::Database(e.to_string()))
    }

    fn init_tables(&self) -> StorageResult<()> {
        let conn = self.lock()?;
        for table in TABLES {
            conn.execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                    id TEXT PRIMARY KEY,
                    data BLOB NOT NULL
                );"
            ))?;
        }
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for SqliteStorage {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn initialize(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn close(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> StorageResult<bool> {
        let conn = self.lock()?;
        let one: i64 = conn.query_row("SELECT 1", [], |row| row.get(0))?;
        Ok(one == 1)
    }

    async fn load_records(&self) -> StorageResult<RecordSet> {
        let conn = self.lock()?;
        let mut records = RecordSet::new();

        for table in TABLES {
            let mut stmt = conn.prepare(&format!("SELECT id, data FROM {table} ORDER BY id"))?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?))
            })?;
            for row in rows {
                let (key, data) = row?;
                codec::decode_into(&mut records, table, &key, &data)?;
            }
        }

        Ok(records)
    }

    async fn commit(&self, batch: &WriteBatch) -> StorageResult<()> {
        let encoded = batch
            .iter()
            .map(codec::encode)
            .collect::<StorageResult<Vec<_>>>()?;

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        for write in &encoded {
            match &write.value {
                Some(data) => {
                    tx.execute(
                        &format!("INSERT OR REPLACE INTO {} (id, data) VALUES (?1, ?2)", write.table),
                        params![write.key, data],
                    )?;
                }
                None => {
                    tx.execute(
                        &format!("DELETE FROM {} WHERE id = ?1", write.table),
                        params![write.key],
                    )?;
                }
            }
        }
        tx.commit()?;

        tracing::trace!("Committed {} writes to sqlite", encoded.len());
        Ok(())
    }
}
