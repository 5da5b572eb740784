//! # Domain Errors
//!
//! Error types for the Slashing Queues subsystem.
//!
//! None of these are recoverable at this layer. Skipping a slash event that
//! failed to encode, decode or persist would make nodes diverge, so the host
//! state machine is expected to halt on any of them.

use thiserror::Error;

/// Errors returned by queue operations.
#[derive(Debug, Error)]
pub enum QueueError {
    /// Event could not be encoded or a stored value could not be decoded.
    #[error("Encoding error: {0}")]
    Encoding(#[from] SerializationError),

    /// Underlying key-value store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] KVStoreError),

    /// Operation on an iterator that cannot serve it.
    #[error("Invalid iterator state: cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    /// Key read back from a queue namespace has the wrong shape.
    #[error("Malformed queue key: {len} bytes, expected {expected}")]
    MalformedKey { len: usize, expected: usize },

    /// Event inserted into the queue of another fault kind.
    #[error("Event of kind {event} cannot be queued in the {queue} queue")]
    WrongQueue {
        queue: &'static str,
        event: &'static str,
    },
}

/// Result type for queue operations.
pub type QueueResult<T> = Result<T, QueueError>;

/// Key-value store errors.
#[derive(Debug, Clone, Error)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError { message: String },
}

/// Serialization errors raised by an event codec.
#[derive(Debug, Clone, Error)]
#[error("Serialization error: {message}")]
pub struct SerializationError {
    pub message: String,
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A namespace tag is empty and would expose the whole store.
    #[error("Namespace tag for the {queue} queue must not be empty")]
    EmptyNamespace { queue: &'static str },

    /// One namespace is a prefix of the other, so the queues would overlap.
    #[error("Namespace tags overlap: {first:?} and {second:?}")]
    OverlappingNamespaces { first: String, second: String },

    /// A release delay of zero would make events due immediately.
    #[error("{period} must be greater than zero")]
    ZeroPeriod { period: &'static str },
}
