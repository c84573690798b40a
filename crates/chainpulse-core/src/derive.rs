//! Trend derivation: percent change between the two most recent samples.

use strum::IntoEnumIterator;

use crate::model::{MetricField, SampleSeries};

/// Direction of a derived trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
}

/// A computed trend for one field. Ephemeral -- recomputed per render,
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedMetric {
    pub field: MetricField,
    pub value: f64,
    pub previous_value: f64,
    pub percent_change: f64,
    pub trend: Trend,
}

/// Compare the last two samples of `series` for `field`.
///
/// With fewer than two samples the previous value equals the latest and the
/// change is zero. A zero previous value also yields zero rather than an
/// infinite or undefined ratio.
pub fn derive(series: &SampleSeries, field: MetricField) -> DerivedMetric {
    let value = series.latest().map_or(0.0, |s| s.get(field));
    let previous_value = if series.samples.len() >= 2 {
        series.samples[series.samples.len() - 2].get(field)
    } else {
        value
    };

    let percent_change = if previous_value == 0.0 {
        0.0
    } else {
        (value - previous_value) / previous_value * 100.0
    };

    let trend = if percent_change >= 0.0 {
        Trend::Up
    } else {
        Trend::Down
    };

    DerivedMetric {
        field,
        value,
        previous_value,
        percent_change,
        trend,
    }
}

/// One [`DerivedMetric`] per field, in declaration order.
pub fn derive_all(series: &SampleSeries) -> Vec<DerivedMetric> {
    MetricField::iter().map(|f| derive(series, f)).collect()
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{HealthSample, Network, Timeframe};

    fn sample(timestamp_ms: i64, active_addresses: f64) -> HealthSample {
        HealthSample {
            timestamp_ms,
            active_addresses,
            transaction_count: 400_000.0,
            average_block_time: 12.0,
            network_hash_rate: 120_000_000.0,
            difficulty: 1_500_000.0,
            fees: 5.0,
        }
    }

    fn series(samples: Vec<HealthSample>) -> SampleSeries {
        SampleSeries {
            network: Network::Ethereum,
            timeframe: Timeframe::TwentyFourHours,
            samples,
        }
    }

    #[test]
    fn single_sample_yields_zero_change_up() {
        let s = series(vec![sample(1_000, 120_000.0)]);
        let metric = derive(&s, MetricField::ActiveAddresses);

        assert_eq!(metric.percent_change, 0.0);
        assert_eq!(metric.trend, Trend::Up);
        assert_eq!(metric.value, metric.previous_value);
    }

    #[test]
    fn twenty_percent_rise_is_derived_exactly() {
        let s = series(vec![sample(1_000, 100_000.0), sample(2_000, 120_000.0)]);
        let metric = derive(&s, MetricField::ActiveAddresses);

        assert_eq!(metric.value, 120_000.0);
        assert_eq!(metric.previous_value, 100_000.0);
        assert_eq!(metric.percent_change, 20.0);
        assert_eq!(metric.trend, Trend::Up);
    }

    #[test]
    fn falling_value_trends_down() {
        let s = series(vec![sample(1_000, 100_000.0), sample(2_000, 75_000.0)]);
        let metric = derive(&s, MetricField::ActiveAddresses);

        assert_eq!(metric.percent_change, -25.0);
        assert_eq!(metric.trend, Trend::Down);
    }

    #[test]
    fn zero_previous_value_never_divides() {
        let s = series(vec![sample(1_000, 0.0), sample(2_000, 50_000.0)]);
        let metric = derive(&s, MetricField::ActiveAddresses);

        assert_eq!(metric.percent_change, 0.0);
        assert_eq!(metric.trend, Trend::Up);
    }

    #[test]
    fn empty_series_is_inert() {
        let s = series(Vec::new());
        let metric = derive(&s, MetricField::Fees);

        assert_eq!(metric.value, 0.0);
        assert_eq!(metric.percent_change, 0.0);
    }

    #[test]
    fn derive_all_covers_every_field() {
        let s = series(vec![sample(1_000, 100_000.0), sample(2_000, 110_000.0)]);
        let metrics = derive_all(&s);

        assert_eq!(metrics.len(), 6);
        assert_eq!(metrics[0].field, MetricField::ActiveAddresses);
        assert!((metrics[0].percent_change - 10.0).abs() < 1e-9);
    }
}
