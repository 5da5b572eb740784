//! # Queue Iterator
//!
//! Forward cursor over one queue's key range.
//!
//! ```text
//! Created ──open──→ Valid ──advance──→ Valid
//!    │                │
//!    └──open──→ Exhausted ←──advance──┘
//!
//! any state ──close──→ Closed (terminal)
//! ```
//!
//! The underlying store cursor is released by `close`, and by `Drop` when the
//! iterator goes out of scope without being closed, so no exit path leaks it.

use crate::adapters::keyspace::PrefixCursor;
use crate::domain::entities::SlashEvent;
use crate::domain::errors::{QueueError, QueueResult};
use crate::domain::keys::QueueKey;
use crate::ports::outbound::{EventCodec, StoreCursor};
use std::fmt;

/// Lifecycle state of a [`QueueIterator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IteratorState {
    /// Constructed, not yet positioned.
    Created,
    /// Positioned on an entry.
    Valid,
    /// Walked past the last entry of the range.
    Exhausted,
    /// Resources released. Terminal.
    Closed,
}

impl IteratorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            IteratorState::Created => "created",
            IteratorState::Valid => "valid",
            IteratorState::Exhausted => "exhausted",
            IteratorState::Closed => "closed",
        }
    }
}

impl fmt::Display for IteratorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cursor over the entries of one slashing queue, in key order.
///
/// Borrows the store for `'a`; the store cannot be written through while
/// the iterator is alive.
pub struct QueueIterator<'a> {
    cursor: Option<PrefixCursor<'a>>,
    state: IteratorState,
}

impl<'a> QueueIterator<'a> {
    /// Wrap a namespaced cursor and position on its first entry.
    pub(crate) fn open(cursor: PrefixCursor<'a>) -> Self {
        let mut iter = Self {
            cursor: Some(cursor),
            state: IteratorState::Created,
        };
        iter.sync_state();
        iter
    }

    fn sync_state(&mut self) {
        self.state = match &self.cursor {
            Some(cursor) if cursor.valid() => IteratorState::Valid,
            Some(_) => IteratorState::Exhausted,
            None => IteratorState::Closed,
        };
    }

    fn invalid(&self, operation: &'static str) -> QueueError {
        QueueError::InvalidState {
            operation,
            state: self.state.as_str(),
        }
    }

    pub fn state(&self) -> IteratorState {
        self.state
    }

    /// Whether the iterator points at an entry. Always false once closed.
    pub fn valid(&self) -> bool {
        self.state == IteratorState::Valid
    }

    /// Move to the next entry.
    pub fn advance(&mut self) -> QueueResult<()> {
        if self.state != IteratorState::Valid {
            return Err(self.invalid("advance"));
        }

        let cursor = self.cursor.as_mut().ok_or(QueueError::InvalidState {
            operation: "advance",
            state: IteratorState::Closed.as_str(),
        })?;

        if let Err(e) = cursor.advance() {
            self.close();
            return Err(e.into());
        }

        self.sync_state();
        Ok(())
    }

    /// Key and encoded value of the current entry.
    pub fn current(&self) -> QueueResult<(QueueKey, &[u8])> {
        let (key, value) = self
            .cursor
            .as_ref()
            .filter(|_| self.state == IteratorState::Valid)
            .and_then(|cursor| cursor.current())
            .ok_or_else(|| self.invalid("read current entry"))?;

        Ok((QueueKey::from_bytes(key)?, value))
    }

    /// Decode the current entry.
    pub fn current_event<C: EventCodec + ?Sized>(&self, codec: &C) -> QueueResult<SlashEvent> {
        let (_, value) = self.current()?;
        Ok(codec.decode(value)?)
    }

    /// Release the underlying cursor. Idempotent.
    pub fn close(&mut self) {
        if let Some(mut cursor) = self.cursor.take() {
            cursor.close();
        }
        self.state = IteratorState::Closed;
    }
}

impl Drop for QueueIterator<'_> {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for QueueIterator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueIterator")
            .field("state", &self.state)
            .finish()
    }
}
