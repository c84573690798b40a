//! Domain model: networks, timeframes, samples, and the fetch state machine.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

// ── Network ──────────────────────────────────────────────────────

/// The fixed set of selectable chains.
///
/// Purely a selection key: the simulated source produces the same value
/// distribution for every network. The accent color is carried here so
/// presentation layers agree on it, but nothing in the core interprets it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Bitcoin,
    Ethereum,
    Solana,
    Polygon,
    Avalanche,
}

impl Network {
    /// Human-readable display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Bitcoin => "Bitcoin",
            Self::Ethereum => "Ethereum",
            Self::Solana => "Solana",
            Self::Polygon => "Polygon",
            Self::Avalanche => "Avalanche",
        }
    }

    /// Brand accent color as an RGB triple. Raw numeric contract only --
    /// mapping to a terminal or widget color type is the consumer's job.
    pub fn accent_rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Bitcoin => (247, 147, 26),
            Self::Ethereum => (98, 126, 234),
            Self::Solana => (20, 241, 149),
            Self::Polygon => (130, 71, 229),
            Self::Avalanche => (232, 65, 66),
        }
    }
}

// ── Timeframe ────────────────────────────────────────────────────

/// A named window mapping to a fixed sample count and spacing.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
pub enum Timeframe {
    #[strum(serialize = "1h")]
    #[serde(rename = "1h")]
    OneHour,
    #[default]
    #[strum(serialize = "24h")]
    #[serde(rename = "24h")]
    TwentyFourHours,
    #[strum(serialize = "7d")]
    #[serde(rename = "7d")]
    SevenDays,
    #[strum(serialize = "30d")]
    #[serde(rename = "30d")]
    ThirtyDays,
}

impl Timeframe {
    /// Number of samples a series for this timeframe contains.
    pub fn interval_count(self) -> usize {
        match self {
            Self::OneHour => 60,
            Self::TwentyFourHours => 24,
            Self::SevenDays => 7,
            Self::ThirtyDays => 30,
        }
    }

    /// Spacing between consecutive samples.
    pub fn step(self) -> Duration {
        match self {
            Self::OneHour => Duration::from_secs(60),
            Self::TwentyFourHours => Duration::from_secs(3_600),
            Self::SevenDays | Self::ThirtyDays => Duration::from_secs(86_400),
        }
    }

    /// Spacing between consecutive samples in epoch milliseconds.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::as_conversions
    )]
    pub fn step_millis(self) -> i64 {
        self.step().as_millis() as i64
    }
}

// ── Metric fields ────────────────────────────────────────────────

/// The six health metrics carried by every sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum MetricField {
    ActiveAddresses,
    TransactionCount,
    AverageBlockTime,
    NetworkHashRate,
    Difficulty,
    Fees,
}

impl MetricField {
    pub fn label(self) -> &'static str {
        match self {
            Self::ActiveAddresses => "Active Addresses",
            Self::TransactionCount => "Transactions",
            Self::AverageBlockTime => "Avg Block Time",
            Self::NetworkHashRate => "Hash Rate",
            Self::Difficulty => "Difficulty",
            Self::Fees => "Fees",
        }
    }
}

// ── Samples ──────────────────────────────────────────────────────

/// One time point of synthetic network health. Immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthSample {
    /// Epoch milliseconds; strictly increasing within a series.
    pub timestamp_ms: i64,
    pub active_addresses: f64,
    pub transaction_count: f64,
    pub average_block_time: f64,
    pub network_hash_rate: f64,
    pub difficulty: f64,
    pub fees: f64,
}

impl HealthSample {
    /// Field accessor by name, for generic card/chart consumers.
    pub fn get(&self, field: MetricField) -> f64 {
        match field {
            MetricField::ActiveAddresses => self.active_addresses,
            MetricField::TransactionCount => self.transaction_count,
            MetricField::AverageBlockTime => self.average_block_time,
            MetricField::NetworkHashRate => self.network_hash_rate,
            MetricField::Difficulty => self.difficulty,
            MetricField::Fees => self.fees,
        }
    }
}

/// One fetch cycle's worth of samples, ascending by timestamp.
///
/// Replaced wholesale on every successful fetch -- there is no incremental
/// mutation, so the series can be shared as `Arc<SampleSeries>` freely.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSeries {
    pub network: Network,
    pub timeframe: Timeframe,
    pub samples: Vec<HealthSample>,
}

impl SampleSeries {
    /// The most recent sample, if any.
    pub fn latest(&self) -> Option<&HealthSample> {
        self.samples.last()
    }

    /// `(timestamp_ms, value)` pairs for one field, chart-ready.
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn field_points(&self, field: MetricField) -> Vec<(f64, f64)> {
        self.samples
            .iter()
            .map(|s| (s.timestamp_ms as f64, s.get(field)))
            .collect()
    }
}

// ── Selection ────────────────────────────────────────────────────

/// The user-selected fetch parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub network: Network,
    pub timeframe: Timeframe,
}

// ── Fetch state ──────────────────────────────────────────────────

/// Fetch lifecycle state, observable via `watch`.
///
/// Exactly one variant holds at any time; the sum type makes loading+error
/// combinations unrepresentable. Owned exclusively by the
/// [`RefreshController`](crate::RefreshController).
#[derive(Debug, Clone, Default)]
pub enum FetchState {
    #[default]
    Loading,
    Error(String),
    Ready(Arc<SampleSeries>),
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// The current series when ready.
    pub fn series(&self) -> Option<&Arc<SampleSeries>> {
        match self {
            Self::Ready(series) => Some(series),
            Self::Loading | Self::Error(_) => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn timeframe_interval_counts() {
        assert_eq!(Timeframe::OneHour.interval_count(), 60);
        assert_eq!(Timeframe::TwentyFourHours.interval_count(), 24);
        assert_eq!(Timeframe::SevenDays.interval_count(), 7);
        assert_eq!(Timeframe::ThirtyDays.interval_count(), 30);
    }

    #[test]
    fn timeframe_parses_short_names() {
        assert_eq!(Timeframe::from_str("1h").unwrap(), Timeframe::OneHour);
        assert_eq!(Timeframe::from_str("30d").unwrap(), Timeframe::ThirtyDays);
        assert!(Timeframe::from_str("2h").is_err());
    }

    #[test]
    fn network_parses_lowercase() {
        assert_eq!(Network::from_str("ethereum").unwrap(), Network::Ethereum);
        assert!(Network::from_str("dogecoin").is_err());
    }

    #[test]
    fn sample_field_accessor_matches_struct_fields() {
        let sample = HealthSample {
            timestamp_ms: 0,
            active_addresses: 1.0,
            transaction_count: 2.0,
            average_block_time: 3.0,
            network_hash_rate: 4.0,
            difficulty: 5.0,
            fees: 6.0,
        };
        assert_eq!(sample.get(MetricField::ActiveAddresses), 1.0);
        assert_eq!(sample.get(MetricField::Fees), 6.0);
    }

    #[test]
    fn fetch_state_defaults_to_loading() {
        assert!(FetchState::default().is_loading());
    }
}
