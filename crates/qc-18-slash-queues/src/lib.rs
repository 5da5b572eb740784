//! # Slashing Queues (qc-18)
//!
//! Deterministic, time-ordered queues of deferred slashing events: one for
//! double-sign faults, one for liveness faults. Both live in the shared
//! ordered key-value store of the node and are drained by the host at block
//! boundaries.
//!
//! ## Key Layout
//!
//! ```text
//! ┌───────────────┬──────────────────────┬────────────────────────┐
//! │ namespace tag │ release_time (u64 BE)│ consensus address (20B)│
//! └───────────────┴──────────────────────┴────────────────────────┘
//!   "dsqueue"        8 bytes                20 bytes
//!   "livequeue"
//! ```
//!
//! Byte order of the key is the processing order: earliest release first,
//! ties broken by address bytes.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Time-Major Order | Iteration visits events by release time, then address |
//! | 2 | Namespace Isolation | A queue never observes keys outside its tag |
//! | 3 | Slot Upsert | One entry per (release time, address); later writes overwrite |
//! | 4 | Guaranteed Release | Iterators release their cursor on every exit path |
//! | 5 | No Mutation While Iterating | An open iterator borrows the store immutably |
//! | 6 | Fatal Failures | Storage and codec failures are surfaced, never skipped |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Entities, key encoding, configuration, errors
//! - `ports/` - Port traits (inbound API, outbound store and codec SPI)
//! - `adapters/` - Keyspace partitioning, storage backends, bincode codec
//! - `service/` - Queue store, queue iterator, both queues composed
//!
//! ## Usage
//!
//! ```ignore
//! use qc_18_slash_queues::{InMemoryKVStore, QueueConfig, SlashQueues, SlashQueueApi};
//!
//! let mut store = InMemoryKVStore::new();
//! let queues = SlashQueues::new(QueueConfig::default())?;
//!
//! queues.insert_double_sign(&mut store, &event)?;
//!
//! queues.iterate_double_sign(&store, |event| {
//!     // slash, return true to stop
//!     false
//! })?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export main types
pub use adapters::{scope, BincodeEventCodec, InMemoryKVStore, PrefixStore};
#[cfg(feature = "rocksdb")]
pub use adapters::{RocksDbConfig, RocksDbStore};
pub use domain::config::{QueueConfig, DOUBLE_SIGN_NAMESPACE, LIVENESS_NAMESPACE};
pub use domain::entities::{ConsensusAddress, FaultKind, SlashEvent, Timestamp, ADDRESS_LEN};
pub use domain::errors::{ConfigError, KVStoreError, QueueError, QueueResult, SerializationError};
pub use domain::keys::{QueueKey, KEY_LEN};
pub use ports::inbound::SlashQueueApi;
pub use ports::outbound::{BatchOperation, EventCodec, KeyValueStore, StoreCursor};
pub use service::{IteratorState, QueueIterator, SlashQueue, SlashQueues};
