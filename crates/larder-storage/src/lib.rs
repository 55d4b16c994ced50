//! Larder Storage - Durable engines behind the recipe graph
//!
//! A backend only has to load every record and commit a batch of writes
//! atomically. The graph facade keeps the authoritative in-memory state and
//! decides what to write.

#![allow(clippy::result_large_err)]

pub mod codec;
pub mod error;
pub mod traits;

#[cfg(feature = "redb")]
pub mod redb;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub mod memory;

pub use error::{StorageError, StorageResult};
pub use traits::StorageBackend;

#[cfg(feature = "redb")]
pub use redb::RedbStorage;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStorage;

pub use memory::MemoryStorage;
