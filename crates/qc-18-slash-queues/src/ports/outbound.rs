//! # Outbound Ports (Driven Ports)
//!
//! Dependencies required by the slashing queues.
//!
//! These are the interfaces the host application provides: an ordered
//! key-value store and a codec for queued events. Default adapters live in
//! `crate::adapters`.

use crate::domain::entities::SlashEvent;
use crate::domain::errors::{KVStoreError, SerializationError};

/// Abstract interface for an ordered key-value store.
///
/// Keys are compared byte-lexicographically. Iteration must follow that
/// order so every node replays queued events identically.
///
/// Production: `RocksDbStore` (feature `rocksdb`)
/// Testing: `InMemoryKVStore`
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;

    /// Put a single key-value pair, overwriting any previous value.
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError>;

    /// Delete a key. Deleting a missing key is not an error.
    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError>;

    /// Execute an atomic batch write.
    ///
    /// Either ALL operations in the batch succeed, or NONE are applied.
    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError>;

    /// Open a forward cursor over `[start, end)`.
    ///
    /// `None` leaves that side unbounded.
    fn iterator<'a>(
        &'a self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
    ) -> Result<Box<dyn StoreCursor + 'a>, KVStoreError>;

    /// Check if a key exists.
    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        Ok(self.get(key)?.is_some())
    }
}

/// Forward cursor over an ordered key range.
///
/// A cursor may hold store resources (read snapshots, file handles).
/// `close` releases them; implementations must also release them on drop.
pub trait StoreCursor {
    /// Whether the cursor points at an entry.
    fn valid(&self) -> bool;

    /// Current key and value, `None` once exhausted or closed.
    fn current(&self) -> Option<(&[u8], &[u8])>;

    /// Move to the next entry.
    fn advance(&mut self) -> Result<(), KVStoreError>;

    /// Release underlying resources. The cursor is invalid afterwards.
    fn close(&mut self);
}

/// Batch operation for atomic writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    /// Put a key-value pair.
    Put { key: Vec<u8>, value: Vec<u8> },
    /// Delete a key.
    Delete { key: Vec<u8> },
}

impl BatchOperation {
    /// Create a Put operation.
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a Delete operation.
    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Delete { key: key.into() }
    }
}

/// Abstract interface for slash event serialization.
pub trait EventCodec: Send + Sync {
    /// Serialize a SlashEvent to bytes.
    fn encode(&self, event: &SlashEvent) -> Result<Vec<u8>, SerializationError>;

    /// Deserialize bytes to a SlashEvent.
    fn decode(&self, data: &[u8]) -> Result<SlashEvent, SerializationError>;
}
