//! Refresh policy and simulated-source tuning consumed by the controller.

use std::ops::Range;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::MetricField;

/// Per-field value ranges for the simulated source.
///
/// Demonstration constants, not semantics: a live data source would replace
/// these with its real telemetry bounds. Carried as configuration so that
/// swap needs no code change in the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldRanges {
    pub active_addresses: Range<f64>,
    pub transaction_count: Range<f64>,
    pub average_block_time: Range<f64>,
    pub network_hash_rate: Range<f64>,
    pub difficulty: Range<f64>,
    pub fees: Range<f64>,
}

impl Default for FieldRanges {
    fn default() -> Self {
        Self {
            active_addresses: 100_000.0..150_000.0,
            transaction_count: 300_000.0..500_000.0,
            average_block_time: 10.0..15.0,
            network_hash_rate: 100_000_000.0..150_000_000.0,
            difficulty: 1_000_000.0..2_000_000.0,
            fees: 1.0..11.0,
        }
    }
}

impl FieldRanges {
    /// The draw range for one field.
    pub fn get(&self, field: MetricField) -> Range<f64> {
        match field {
            MetricField::ActiveAddresses => self.active_addresses.clone(),
            MetricField::TransactionCount => self.transaction_count.clone(),
            MetricField::AverageBlockTime => self.average_block_time.clone(),
            MetricField::NetworkHashRate => self.network_hash_rate.clone(),
            MetricField::Difficulty => self.difficulty.clone(),
            MetricField::Fees => self.fees.clone(),
        }
    }
}

/// Controller and simulated-source configuration.
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Periodic re-fetch interval. Zero disables the timer (one-shot mode).
    pub refresh_interval: Duration,

    /// Probability that a generation attempt fails, in [0, 1].
    pub failure_probability: f64,

    /// Simulated upstream latency before a generation resolves.
    pub latency: Duration,

    /// Value ranges for the simulated draws.
    pub ranges: FieldRanges,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(300),
            failure_probability: 0.1,
            latency: Duration::from_secs(1),
            ranges: FieldRanges::default(),
        }
    }
}

impl RefreshConfig {
    /// Reject out-of-domain values before they reach the generator.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(0.0..=1.0).contains(&self.failure_probability) {
            return Err(CoreError::Config {
                message: format!(
                    "failure_probability must be within [0, 1], got {}",
                    self.failure_probability
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(RefreshConfig::default().validate().is_ok());
    }

    #[test]
    fn out_of_range_probability_is_rejected() {
        let config = RefreshConfig {
            failure_probability: 1.5,
            ..RefreshConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CoreError::Config { .. })
        ));
    }
}
