//! # Queue Keys
//!
//! Sortable composite keys for the slashing queues.
//!
//! ## Layout
//!
//! ```text
//! [release_time: u64 big-endian (8 bytes)][address (20 bytes)]
//! ```
//!
//! Big-endian time first makes byte-lexicographic order equal to
//! chronological order, so a forward range scan replays events in release
//! order. The address breaks ties, so two events only share a key when they
//! are the same validator released at the same time (last insert wins).

use crate::domain::entities::{ConsensusAddress, Timestamp, ADDRESS_LEN};
use crate::domain::errors::QueueError;

/// Width of the encoded release time.
pub const TIME_LEN: usize = 8;

/// Total encoded key length (without the namespace tag).
pub const KEY_LEN: usize = TIME_LEN + ADDRESS_LEN;

/// Position of an event inside a queue.
///
/// Field order matters: the derived `Ord` compares `release_time` first and
/// `address` second, which matches the byte order of [`QueueKey::to_bytes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueueKey {
    pub release_time: Timestamp,
    pub address: ConsensusAddress,
}

impl QueueKey {
    pub fn new(release_time: Timestamp, address: ConsensusAddress) -> Self {
        Self {
            release_time,
            address,
        }
    }

    /// Encode the key as stored under the queue namespace.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut key = Vec::with_capacity(KEY_LEN);
        key.extend_from_slice(&self.release_time.to_be_bytes());
        key.extend_from_slice(self.address.as_bytes());
        key
    }

    /// Decode a key read back from a queue namespace.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, QueueError> {
        if bytes.len() != KEY_LEN {
            return Err(QueueError::MalformedKey {
                len: bytes.len(),
                expected: KEY_LEN,
            });
        }

        let (time, address) = bytes.split_at(TIME_LEN);
        let mut time_bytes = [0u8; TIME_LEN];
        time_bytes.copy_from_slice(time);

        let address = ConsensusAddress::from_slice(address).ok_or(QueueError::MalformedKey {
            len: bytes.len(),
            expected: KEY_LEN,
        })?;

        Ok(Self {
            release_time: u64::from_be_bytes(time_bytes),
            address,
        })
    }

    /// Exclusive end bound covering every key released at or before `now`.
    ///
    /// `None` means unbounded (every key is due at `u64::MAX`).
    pub fn due_upper_bound(now: Timestamp) -> Option<Vec<u8>> {
        now.checked_add(1).map(|t| t.to_be_bytes().to_vec())
    }
}
