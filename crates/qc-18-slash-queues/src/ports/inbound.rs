//! # Inbound Ports (Driving Ports)
//!
//! The surface the host state machine drives: fault detection inserts,
//! the periodic tick iterates and removes.

use crate::domain::entities::SlashEvent;
use crate::domain::errors::QueueResult;
use crate::domain::keys::QueueKey;
use crate::ports::outbound::KeyValueStore;

/// Primary API of the slashing queues.
///
/// Callbacks return `true` to stop iterating. Every error is fatal for the
/// host: the queues never skip or retry an entry.
pub trait SlashQueueApi {
    /// Queue a double-sign event at its release time.
    fn insert_double_sign<K>(&self, store: &mut K, event: &SlashEvent) -> QueueResult<QueueKey>
    where
        K: KeyValueStore + ?Sized;

    /// Queue a liveness event at its release time.
    fn insert_liveness<K>(&self, store: &mut K, event: &SlashEvent) -> QueueResult<QueueKey>
    where
        K: KeyValueStore + ?Sized;

    /// Remove a processed double-sign event. Missing keys are ignored.
    fn remove_double_sign<K>(&self, store: &mut K, key: &QueueKey) -> QueueResult<()>
    where
        K: KeyValueStore + ?Sized;

    /// Remove a processed liveness event. Missing keys are ignored.
    fn remove_liveness<K>(&self, store: &mut K, key: &QueueKey) -> QueueResult<()>
    where
        K: KeyValueStore + ?Sized;

    /// Walk the double-sign queue in release order.
    ///
    /// Returns the number of events handed to the callback.
    fn iterate_double_sign<K, F>(&self, store: &K, callback: F) -> QueueResult<usize>
    where
        K: KeyValueStore + ?Sized,
        F: FnMut(SlashEvent) -> bool;

    /// Walk the liveness queue in release order.
    fn iterate_liveness<K, F>(&self, store: &K, callback: F) -> QueueResult<usize>
    where
        K: KeyValueStore + ?Sized,
        F: FnMut(SlashEvent) -> bool;
}
