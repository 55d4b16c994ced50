//! Storage backend trait definitions

use crate::error::StorageResult;
use async_trait::async_trait;
use larder_core::{RecordSet, WriteBatch};

/// Trait for storage backend implementations
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Short engine name for logs ("memory", "redb", "sqlite")
    fn name(&self) -> &'static str;

    /// Initialize the storage (create tables, etc.)
    async fn initialize(&self) -> StorageResult<()>;

    /// Close the storage connection
    async fn close(&self) -> StorageResult<()>;

    /// Health check
    async fn health_check(&self) -> StorageResult<bool>;

    /// Load every persisted record
    async fn load_records(&self) -> StorageResult<RecordSet>;

    /// Persist a batch of writes. Either every write lands or none does.
    async fn commit(&self, batch: &WriteBatch) -> StorageResult<()>;
}
