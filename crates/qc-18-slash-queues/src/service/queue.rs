//! # Slash Queue
//!
//! One logical queue of deferred slash events, generic over fault kind.
//!
//! A queue owns only its namespace tag and codec. The store handle is passed
//! into every operation, so the same queue value can serve any block's
//! state view.

use crate::adapters::keyspace::{scope, PrefixCursor, PrefixStore};
use crate::adapters::serializer::BincodeEventCodec;
use crate::domain::config::{DOUBLE_SIGN_NAMESPACE, LIVENESS_NAMESPACE};
use crate::domain::entities::{FaultKind, SlashEvent, Timestamp};
use crate::domain::errors::{ConfigError, QueueError, QueueResult};
use crate::domain::keys::QueueKey;
use crate::ports::outbound::{BatchOperation, EventCodec, KeyValueStore};
use crate::service::iterator::QueueIterator;
use tracing::{debug, error, info, trace};

/// Time-ordered queue of slash events of one fault kind.
#[derive(Debug, Clone)]
pub struct SlashQueue<C = BincodeEventCodec> {
    kind: FaultKind,
    namespace: Vec<u8>,
    codec: C,
}

impl SlashQueue<BincodeEventCodec> {
    /// Double-sign queue under the default `dsqueue` namespace.
    pub fn double_sign() -> Self {
        Self::unchecked(FaultKind::DoubleSign, DOUBLE_SIGN_NAMESPACE, BincodeEventCodec)
    }

    /// Liveness queue under the default `livequeue` namespace.
    pub fn liveness() -> Self {
        Self::unchecked(FaultKind::Liveness, LIVENESS_NAMESPACE, BincodeEventCodec)
    }
}

impl<C: EventCodec> SlashQueue<C> {
    /// Queue of `kind` under a custom namespace tag.
    ///
    /// An empty tag would scope the queue to the whole store, so it is
    /// rejected. Overlap between two queues' tags is checked by
    /// [`QueueConfig::validate`](crate::QueueConfig::validate).
    pub fn new(
        kind: FaultKind,
        namespace: impl Into<Vec<u8>>,
        codec: C,
    ) -> Result<Self, ConfigError> {
        let namespace = namespace.into();
        if namespace.is_empty() {
            return Err(ConfigError::EmptyNamespace {
                queue: kind.as_str(),
            });
        }
        Ok(Self::unchecked(kind, namespace, codec))
    }

    fn unchecked(kind: FaultKind, namespace: impl Into<Vec<u8>>, codec: C) -> Self {
        Self {
            kind,
            namespace: namespace.into(),
            codec,
        }
    }

    pub fn kind(&self) -> FaultKind {
        self.kind
    }

    pub fn namespace(&self) -> &[u8] {
        &self.namespace
    }

    /// Scoped view of `store` holding this queue's entries.
    pub fn store<'a, K>(&self, store: &'a mut K) -> PrefixStore<'a, K>
    where
        K: KeyValueStore + ?Sized,
    {
        scope(store, &self.namespace)
    }

    /// Log and hand back a failure. Every queue error halts the host.
    fn fail(&self, operation: &'static str, err: QueueError) -> QueueError {
        error!(
            queue = %self.kind,
            operation,
            error = %err,
            "[qc-18] slash queue operation failed"
        );
        err
    }

    /// Queue `event` at its release time.
    ///
    /// Overwrites any event of the same validator released at the same time.
    /// Besides encoding and store failures, an event of another fault kind is
    /// rejected with [`QueueError::WrongQueue`]; that can only come from a
    /// routing bug in the caller and is checked before anything is written.
    pub fn insert<K>(&self, store: &mut K, event: &SlashEvent) -> QueueResult<QueueKey>
    where
        K: KeyValueStore + ?Sized,
    {
        if event.fault_kind != self.kind {
            return Err(self.fail(
                "insert",
                QueueError::WrongQueue {
                    queue: self.kind.as_str(),
                    event: event.fault_kind.as_str(),
                },
            ));
        }

        let bytes = self
            .codec
            .encode(event)
            .map_err(|e| self.fail("insert", e.into()))?;
        let key = event.store_key();

        self.store(store)
            .put(&key.to_bytes(), &bytes)
            .map_err(|e| self.fail("insert", e.into()))?;

        debug!(
            queue = %self.kind,
            address = %event.address,
            release_time = event.release_time,
            "[qc-18] slash event queued"
        );
        Ok(key)
    }

    /// Remove the entry at `key`. Missing entries are ignored.
    pub fn remove<K>(&self, store: &mut K, key: &QueueKey) -> QueueResult<()>
    where
        K: KeyValueStore + ?Sized,
    {
        self.store(store)
            .delete(&key.to_bytes())
            .map_err(|e| self.fail("remove", e.into()))?;

        debug!(
            queue = %self.kind,
            address = %key.address,
            release_time = key.release_time,
            "[qc-18] slash event removed"
        );
        Ok(())
    }

    /// Read the entry at `key`.
    pub fn get<K>(&self, store: &K, key: &QueueKey) -> QueueResult<Option<SlashEvent>>
    where
        K: KeyValueStore + ?Sized,
    {
        let mut full = self.namespace.clone();
        full.extend_from_slice(&key.to_bytes());

        let Some(bytes) = store.get(&full).map_err(|e| self.fail("get", e.into()))? else {
            return Ok(None);
        };
        let event = self
            .codec
            .decode(&bytes)
            .map_err(|e| self.fail("get", e.into()))?;
        Ok(Some(event))
    }

    /// Iterator over the whole queue, earliest release first.
    pub fn new_iterator<'a, K>(&self, store: &'a K) -> QueueResult<QueueIterator<'a>>
    where
        K: KeyValueStore + ?Sized,
    {
        self.open_iterator(store, None)
    }

    /// Iterator over the entries released at or before `now`.
    pub fn due_iterator<'a, K>(&self, store: &'a K, now: Timestamp) -> QueueResult<QueueIterator<'a>>
    where
        K: KeyValueStore + ?Sized,
    {
        self.open_iterator(store, Some(now))
    }

    fn open_iterator<'a, K>(
        &self,
        store: &'a K,
        due_at: Option<Timestamp>,
    ) -> QueueResult<QueueIterator<'a>>
    where
        K: KeyValueStore + ?Sized,
    {
        let end = due_at.and_then(QueueKey::due_upper_bound);
        let cursor = PrefixCursor::open(store, &self.namespace, None, end.as_deref())
            .map_err(|e| self.fail("open iterator", e.into()))?;
        Ok(QueueIterator::open(cursor))
    }

    /// Walk the queue in release order, calling `callback` per event.
    ///
    /// `callback` returns `true` to stop. The iterator is closed before this
    /// returns on every path, including a panic unwinding out of `callback`.
    /// Returns the number of events handed to `callback`.
    pub fn iterate<K, F>(&self, store: &K, callback: F) -> QueueResult<usize>
    where
        K: KeyValueStore + ?Sized,
        F: FnMut(SlashEvent) -> bool,
    {
        let iter = self.new_iterator(store)?;
        self.walk(iter, callback)
    }

    /// Like [`iterate`](Self::iterate), limited to events due at `now`.
    pub fn iterate_due<K, F>(&self, store: &K, now: Timestamp, callback: F) -> QueueResult<usize>
    where
        K: KeyValueStore + ?Sized,
        F: FnMut(SlashEvent) -> bool,
    {
        let iter = self.due_iterator(store, now)?;
        self.walk(iter, callback)
    }

    fn walk<F>(&self, mut iter: QueueIterator<'_>, mut callback: F) -> QueueResult<usize>
    where
        F: FnMut(SlashEvent) -> bool,
    {
        let mut visited = 0;

        while iter.valid() {
            let event = iter
                .current_event(&self.codec)
                .map_err(|e| self.fail("iterate", e))?;
            trace!(
                queue = %self.kind,
                address = %event.address,
                release_time = event.release_time,
                "[qc-18] visiting slash event"
            );

            visited += 1;
            if callback(event) {
                break;
            }
            iter.advance().map_err(|e| self.fail("iterate", e))?;
        }

        iter.close();
        Ok(visited)
    }

    /// Remove and return every event due at `now`, earliest first.
    ///
    /// Events are collected with the iterator closed before anything is
    /// deleted, then removed in one atomic batch.
    pub fn drain_due<K>(&self, store: &mut K, now: Timestamp) -> QueueResult<Vec<SlashEvent>>
    where
        K: KeyValueStore + ?Sized,
    {
        let mut due = Vec::new();
        self.iterate_due(&*store, now, |event| {
            due.push(event);
            false
        })?;

        if due.is_empty() {
            return Ok(due);
        }

        let deletes = due
            .iter()
            .map(|event| BatchOperation::delete(event.store_key().to_bytes()))
            .collect();
        self.store(store)
            .atomic_batch_write(deletes)
            .map_err(|e| self.fail("drain", e.into()))?;

        info!(
            queue = %self.kind,
            count = due.len(),
            now,
            "[qc-18] drained due slash events"
        );
        Ok(due)
    }

    /// Number of queued entries.
    ///
    /// Every key is parsed on the way, so a malformed entry fails here the
    /// same way it fails [`iterate`](Self::iterate).
    pub fn len<K>(&self, store: &K) -> QueueResult<usize>
    where
        K: KeyValueStore + ?Sized,
    {
        let mut iter = self.new_iterator(store)?;
        let mut count = 0;
        while iter.valid() {
            iter.current().map_err(|e| self.fail("len", e))?;
            count += 1;
            iter.advance().map_err(|e| self.fail("len", e))?;
        }
        Ok(count)
    }

    pub fn is_empty<K>(&self, store: &K) -> QueueResult<bool>
    where
        K: KeyValueStore + ?Sized,
    {
        let iter = self.new_iterator(store)?;
        if !iter.valid() {
            return Ok(true);
        }
        iter.current().map_err(|e| self.fail("is_empty", e))?;
        Ok(false)
    }
}
