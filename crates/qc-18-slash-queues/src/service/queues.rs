//! # Slash Queues Service
//!
//! Both slashing queues, built once from configuration and routed by fault
//! kind.

use crate::adapters::serializer::BincodeEventCodec;
use crate::domain::config::QueueConfig;
use crate::domain::entities::{ConsensusAddress, FaultKind, SlashEvent, Timestamp};
use crate::domain::errors::{ConfigError, QueueResult};
use crate::domain::keys::QueueKey;
use crate::ports::inbound::SlashQueueApi;
use crate::ports::outbound::{EventCodec, KeyValueStore};
use crate::service::queue::SlashQueue;
use tracing::debug;

/// The double-sign and liveness queues of the slashing subsystem.
#[derive(Debug, Clone)]
pub struct SlashQueues<C = BincodeEventCodec> {
    config: QueueConfig,
    double_sign: SlashQueue<C>,
    liveness: SlashQueue<C>,
}

impl SlashQueues<BincodeEventCodec> {
    /// Build both queues with the default bincode codec.
    pub fn new(config: QueueConfig) -> Result<Self, ConfigError> {
        Self::with_codec(config, BincodeEventCodec)
    }
}

impl<C: EventCodec + Clone> SlashQueues<C> {
    /// Build both queues with a custom codec.
    pub fn with_codec(config: QueueConfig, codec: C) -> Result<Self, ConfigError> {
        config.validate()?;

        let double_sign = SlashQueue::new(
            FaultKind::DoubleSign,
            config.namespace(FaultKind::DoubleSign),
            codec.clone(),
        )?;
        let liveness = SlashQueue::new(
            FaultKind::Liveness,
            config.namespace(FaultKind::Liveness),
            codec,
        )?;

        debug!(
            unbonding_period_secs = config.unbonding_period_secs,
            jail_period_secs = config.jail_period_secs,
            "[qc-18] slash queues initialized"
        );

        Ok(Self {
            config,
            double_sign,
            liveness,
        })
    }
}

impl<C: EventCodec> SlashQueues<C> {
    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// The queue holding events of `kind`.
    pub fn queue(&self, kind: FaultKind) -> &SlashQueue<C> {
        match kind {
            FaultKind::DoubleSign => &self.double_sign,
            FaultKind::Liveness => &self.liveness,
        }
    }

    pub fn double_sign(&self) -> &SlashQueue<C> {
        &self.double_sign
    }

    pub fn liveness(&self) -> &SlashQueue<C> {
        &self.liveness
    }

    /// Queue `event` in the queue matching its fault kind.
    pub fn insert<K>(&self, store: &mut K, event: &SlashEvent) -> QueueResult<QueueKey>
    where
        K: KeyValueStore + ?Sized,
    {
        self.queue(event.fault_kind).insert(store, event)
    }

    /// Schedule a fault after the delay configured for its kind.
    pub fn schedule<K>(
        &self,
        store: &mut K,
        fault_kind: FaultKind,
        address: ConsensusAddress,
        infraction_height: u64,
        infraction_time: Timestamp,
        power: u64,
    ) -> QueueResult<QueueKey>
    where
        K: KeyValueStore + ?Sized,
    {
        let event = SlashEvent::scheduled(
            &self.config,
            address,
            fault_kind,
            infraction_height,
            infraction_time,
            power,
        );
        self.insert(store, &event)
    }
}

impl<C: EventCodec> SlashQueueApi for SlashQueues<C> {
    fn insert_double_sign<K>(&self, store: &mut K, event: &SlashEvent) -> QueueResult<QueueKey>
    where
        K: KeyValueStore + ?Sized,
    {
        self.double_sign.insert(store, event)
    }

    fn insert_liveness<K>(&self, store: &mut K, event: &SlashEvent) -> QueueResult<QueueKey>
    where
        K: KeyValueStore + ?Sized,
    {
        self.liveness.insert(store, event)
    }

    fn remove_double_sign<K>(&self, store: &mut K, key: &QueueKey) -> QueueResult<()>
    where
        K: KeyValueStore + ?Sized,
    {
        self.double_sign.remove(store, key)
    }

    fn remove_liveness<K>(&self, store: &mut K, key: &QueueKey) -> QueueResult<()>
    where
        K: KeyValueStore + ?Sized,
    {
        self.liveness.remove(store, key)
    }

    fn iterate_double_sign<K, F>(&self, store: &K, callback: F) -> QueueResult<usize>
    where
        K: KeyValueStore + ?Sized,
        F: FnMut(SlashEvent) -> bool,
    {
        self.double_sign.iterate(store, callback)
    }

    fn iterate_liveness<K, F>(&self, store: &K, callback: F) -> QueueResult<usize>
    where
        K: KeyValueStore + ?Sized,
        F: FnMut(SlashEvent) -> bool,
    {
        self.liveness.iterate(store, callback)
    }
}
