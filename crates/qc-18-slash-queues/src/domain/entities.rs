//! # Slashing Entities
//!
//! Core entities queued by the slashing subsystem.
//!
//! A `SlashEvent` is created by fault detection, read by the periodic tick,
//! and removed explicitly once the tick has acted on it. It is never mutated
//! while stored.

use crate::domain::config::QueueConfig;
use crate::domain::keys::QueueKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a validator consensus address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Unix timestamp in seconds since epoch.
pub type Timestamp = u64;

/// Fixed-length consensus address of a validator.
///
/// Ordered byte-wise, which is the tie-breaker for events released at the
/// same time.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct ConsensusAddress(pub [u8; ADDRESS_LEN]);

impl ConsensusAddress {
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Build an address from a slice, `None` if the length is wrong.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let array: [u8; ADDRESS_LEN] = bytes.try_into().ok()?;
        Some(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl fmt::Display for ConsensusAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for ConsensusAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConsensusAddress({})", hex::encode(self.0))
    }
}

/// Category of punishable fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaultKind {
    /// Validator signed two conflicting blocks at the same height.
    DoubleSign,
    /// Validator missed too many blocks in the signing window.
    Liveness,
}

impl FaultKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaultKind::DoubleSign => "double-sign",
            FaultKind::Liveness => "liveness",
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A deferred punishment waiting in one of the slashing queues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashEvent {
    /// Validator at fault.
    pub address: ConsensusAddress,
    /// Which queue this event belongs to.
    pub fault_kind: FaultKind,
    /// Block height at which the fault occurred.
    pub infraction_height: u64,
    /// Block time at which the fault occurred.
    pub infraction_time: Timestamp,
    /// Time at which the event becomes actionable.
    ///
    /// Resolved by the caller (infraction time plus the unbonding or jail
    /// period). The queue only orders by it.
    pub release_time: Timestamp,
    /// Voting power of the validator at the infraction height.
    pub power: u64,
    /// Slash fraction already applied for this validator, in basis points.
    pub slashed_so_far_bps: u32,
}

impl SlashEvent {
    /// Create a new slash event with an already resolved release time.
    pub fn new(
        address: ConsensusAddress,
        fault_kind: FaultKind,
        infraction_height: u64,
        infraction_time: Timestamp,
        release_time: Timestamp,
        power: u64,
    ) -> Self {
        Self {
            address,
            fault_kind,
            infraction_height,
            infraction_time,
            release_time,
            power,
            slashed_so_far_bps: 0,
        }
    }

    /// Create an event released after the delay configured for its kind.
    pub fn scheduled(
        config: &QueueConfig,
        address: ConsensusAddress,
        fault_kind: FaultKind,
        infraction_height: u64,
        infraction_time: Timestamp,
        power: u64,
    ) -> Self {
        let release_time = config.release_time(fault_kind, infraction_time);
        Self::new(
            address,
            fault_kind,
            infraction_height,
            infraction_time,
            release_time,
            power,
        )
    }

    /// Set the slash fraction already applied.
    pub fn with_slashed_so_far(mut self, bps: u32) -> Self {
        self.slashed_so_far_bps = bps;
        self
    }

    /// Key under which this event is stored in its queue.
    pub fn store_key(&self) -> QueueKey {
        QueueKey::new(self.release_time, self.address)
    }

    /// Whether the event is actionable at `now`.
    pub fn is_due(&self, now: Timestamp) -> bool {
        self.release_time <= now
    }
}
