//! # Queue Configuration
//!
//! Namespace tags and release delays for the slashing queues.
//!
//! The namespace tags are part of the persisted key layout. Changing them on
//! a live chain orphans every queued event.

use crate::domain::entities::{FaultKind, Timestamp};
use crate::domain::errors::ConfigError;
use serde::{Deserialize, Serialize};

/// Default namespace tag of the double-sign queue.
pub const DOUBLE_SIGN_NAMESPACE: &[u8] = b"dsqueue";

/// Default namespace tag of the liveness queue.
pub const LIVENESS_NAMESPACE: &[u8] = b"livequeue";

/// Configuration for the slashing queues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Key prefix of the double-sign queue (default: `dsqueue`).
    pub double_sign_namespace: Vec<u8>,

    /// Key prefix of the liveness queue (default: `livequeue`).
    pub liveness_namespace: Vec<u8>,

    /// Delay before a double-sign event is released (default: 21 days).
    pub unbonding_period_secs: u64,

    /// Delay before a liveness event is released (default: 10 minutes).
    pub jail_period_secs: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            double_sign_namespace: DOUBLE_SIGN_NAMESPACE.to_vec(),
            liveness_namespace: LIVENESS_NAMESPACE.to_vec(),
            unbonding_period_secs: 21 * 24 * 60 * 60,
            jail_period_secs: 10 * 60,
        }
    }
}

impl QueueConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the unbonding period.
    pub fn with_unbonding_period(mut self, secs: u64) -> Self {
        self.unbonding_period_secs = secs;
        self
    }

    /// Set the jail period.
    pub fn with_jail_period(mut self, secs: u64) -> Self {
        self.jail_period_secs = secs;
        self
    }

    /// Override both namespace tags.
    pub fn with_namespaces(
        mut self,
        double_sign: impl Into<Vec<u8>>,
        liveness: impl Into<Vec<u8>>,
    ) -> Self {
        self.double_sign_namespace = double_sign.into();
        self.liveness_namespace = liveness.into();
        self
    }

    /// Namespace tag for a queue.
    pub fn namespace(&self, kind: FaultKind) -> &[u8] {
        match kind {
            FaultKind::DoubleSign => &self.double_sign_namespace,
            FaultKind::Liveness => &self.liveness_namespace,
        }
    }

    /// Release delay for a queue.
    pub fn period(&self, kind: FaultKind) -> u64 {
        match kind {
            FaultKind::DoubleSign => self.unbonding_period_secs,
            FaultKind::Liveness => self.jail_period_secs,
        }
    }

    /// Release time of a fault that happened at `infraction_time`.
    pub fn release_time(&self, kind: FaultKind, infraction_time: Timestamp) -> Timestamp {
        infraction_time.saturating_add(self.period(kind))
    }

    /// Check that the queues cannot observe each other's keys.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.double_sign_namespace.is_empty() {
            return Err(ConfigError::EmptyNamespace {
                queue: FaultKind::DoubleSign.as_str(),
            });
        }
        if self.liveness_namespace.is_empty() {
            return Err(ConfigError::EmptyNamespace {
                queue: FaultKind::Liveness.as_str(),
            });
        }

        let (ds, live) = (&self.double_sign_namespace, &self.liveness_namespace);
        if ds.starts_with(live) || live.starts_with(ds) {
            return Err(ConfigError::OverlappingNamespaces {
                first: String::from_utf8_lossy(ds).into_owned(),
                second: String::from_utf8_lossy(live).into_owned(),
            });
        }

        if self.unbonding_period_secs == 0 {
            return Err(ConfigError::ZeroPeriod {
                period: "unbonding_period_secs",
            });
        }
        if self.jail_period_secs == 0 {
            return Err(ConfigError::ZeroPeriod {
                period: "jail_period_secs",
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = QueueConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.namespace(FaultKind::DoubleSign), b"dsqueue");
        assert_eq!(config.namespace(FaultKind::Liveness), b"livequeue");
    }

    #[test]
    fn test_release_time_per_kind() {
        let config = QueueConfig::new()
            .with_unbonding_period(1_000)
            .with_jail_period(10);

        assert_eq!(config.release_time(FaultKind::DoubleSign, 500), 1_500);
        assert_eq!(config.release_time(FaultKind::Liveness, 500), 510);
        assert_eq!(config.release_time(FaultKind::Liveness, u64::MAX), u64::MAX);
    }

    #[test]
    fn test_overlapping_namespaces_rejected() {
        let config = QueueConfig::new().with_namespaces(b"queue".to_vec(), b"queue/live".to_vec());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OverlappingNamespaces { .. })
        ));

        let same = QueueConfig::new().with_namespaces(b"q".to_vec(), b"q".to_vec());
        assert!(same.validate().is_err());
    }

    #[test]
    fn test_empty_namespace_rejected() {
        let config = QueueConfig::new().with_namespaces(Vec::new(), b"livequeue".to_vec());
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyNamespace {
                queue: "double-sign"
            })
        );
    }

    #[test]
    fn test_zero_period_rejected() {
        let config = QueueConfig::new().with_jail_period(0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroPeriod {
                period: "jail_period_secs"
            })
        );
    }
}
