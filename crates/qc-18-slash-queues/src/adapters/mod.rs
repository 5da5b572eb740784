//! # Adapters Module
//!
//! Adapter implementations for the Slashing Queues subsystem.
//!
//! ## Modules
//!
//! - `keyspace`: Prefixed views isolating each queue in the shared store
//! - `storage`: `KeyValueStore` backends (in-memory, RocksDB)
//! - `serializer`: `EventCodec` backends (bincode)

pub mod keyspace;
pub mod serializer;
pub mod storage;

pub use keyspace::{prefix_end_bound, scope, PrefixCursor, PrefixStore};
pub use serializer::BincodeEventCodec;
pub use storage::InMemoryKVStore;
#[cfg(feature = "rocksdb")]
pub use storage::{RocksDbConfig, RocksDbStore};
