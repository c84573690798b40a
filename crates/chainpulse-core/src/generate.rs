//! Sample sources: the trait seam and the simulated implementation.
//!
//! [`SampleSource`] is the point a live telemetry backend would plug into.
//! The only implementation shipped here is [`SimulatedSource`], which shapes
//! pseudo-random values by timeframe and fails with a configured probability
//! to exercise the error path of the refresh pipeline.

use std::future::Future;

use chrono::Utc;
use rand::Rng;
use tracing::debug;

use crate::config::{FieldRanges, RefreshConfig};
use crate::error::CoreError;
use crate::model::{HealthSample, Network, SampleSeries, Timeframe};

/// Produces one [`SampleSeries`] per fetch cycle.
///
/// Asynchronous: an implementation may suspend before resolving success or
/// failure. Implementations must not retain state between calls -- every
/// invocation produces an independent, complete series.
pub trait SampleSource: Send + Sync {
    fn generate(
        &self,
        network: Network,
        timeframe: Timeframe,
    ) -> impl Future<Output = Result<SampleSeries, CoreError>> + Send;
}

/// Pseudo-random source simulating an unreliable metrics upstream.
///
/// `network` does not influence the generated values -- it only selects the
/// presentation accent downstream. A real backend would branch on it here.
#[derive(Debug, Clone)]
pub struct SimulatedSource {
    failure_probability: f64,
    latency: std::time::Duration,
    ranges: FieldRanges,
}

impl SimulatedSource {
    pub fn new(config: &RefreshConfig) -> Self {
        Self {
            failure_probability: config.failure_probability,
            latency: config.latency,
            ranges: config.ranges.clone(),
        }
    }

    /// Draw one sample with the given timestamp. Each field is an
    /// independent uniform draw within its configured range.
    fn draw_sample(&self, rng: &mut impl Rng, timestamp_ms: i64) -> HealthSample {
        HealthSample {
            timestamp_ms,
            active_addresses: rng.random_range(self.ranges.active_addresses.clone()),
            transaction_count: rng.random_range(self.ranges.transaction_count.clone()),
            average_block_time: rng.random_range(self.ranges.average_block_time.clone()),
            network_hash_rate: rng.random_range(self.ranges.network_hash_rate.clone()),
            difficulty: rng.random_range(self.ranges.difficulty.clone()),
            fees: rng.random_range(self.ranges.fees.clone()),
        }
    }
}

impl SampleSource for SimulatedSource {
    async fn generate(
        &self,
        network: Network,
        timeframe: Timeframe,
    ) -> Result<SampleSeries, CoreError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        // ThreadRng is not Send -- keep all draws after the suspension point.
        let mut rng = rand::rng();

        if rng.random::<f64>() < self.failure_probability {
            debug!(%network, %timeframe, "simulated upstream failure");
            return Err(CoreError::generation(format!(
                "{} telemetry upstream unavailable",
                network.label()
            )));
        }

        let count = timeframe.interval_count();
        let step = timeframe.step_millis();
        let now_ms = Utc::now().timestamp_millis();

        // Walk backwards from the generation instant so the last sample
        // lands on `now` and spacing stays uniform.
        #[allow(clippy::cast_possible_wrap, clippy::as_conversions)]
        let samples: Vec<HealthSample> = (0..count)
            .map(|i| {
                let offset = (count - 1 - i) as i64 * step;
                self.draw_sample(&mut rng, now_ms - offset)
            })
            .collect();

        Ok(SampleSeries {
            network,
            timeframe,
            samples,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::model::MetricField;

    fn within_ranges(sample: &HealthSample, ranges: &FieldRanges) -> bool {
        MetricField::iter().all(|field| ranges.get(field).contains(&sample.get(field)))
    }

    fn instant_source(failure_probability: f64) -> SimulatedSource {
        SimulatedSource::new(&RefreshConfig {
            failure_probability,
            latency: std::time::Duration::ZERO,
            ..RefreshConfig::default()
        })
    }

    #[tokio::test]
    async fn series_length_matches_every_timeframe() {
        let source = instant_source(0.0);
        for timeframe in Timeframe::iter() {
            let series = source
                .generate(Network::Bitcoin, timeframe)
                .await
                .unwrap();
            assert_eq!(series.samples.len(), timeframe.interval_count());
        }
    }

    #[tokio::test]
    async fn timestamps_strictly_increase_with_constant_step() {
        let source = instant_source(0.0);
        for timeframe in Timeframe::iter() {
            let series = source
                .generate(Network::Ethereum, timeframe)
                .await
                .unwrap();
            let step = timeframe.step_millis();
            for pair in series.samples.windows(2) {
                assert_eq!(pair[1].timestamp_ms - pair[0].timestamp_ms, step);
            }
        }
    }

    #[tokio::test]
    async fn last_sample_lands_on_generation_instant() {
        let source = instant_source(0.0);
        let series = source
            .generate(Network::Solana, Timeframe::TwentyFourHours)
            .await
            .unwrap();

        assert_eq!(series.samples.len(), 24);
        let last = series.latest().unwrap().timestamp_ms;
        let now = Utc::now().timestamp_millis();
        assert!(
            (now - last).abs() < 1000,
            "last timestamp {last} not within 1s of {now}"
        );
    }

    #[tokio::test]
    async fn every_field_stays_within_its_range() {
        let source = instant_source(0.0);
        let ranges = FieldRanges::default();
        let series = source
            .generate(Network::Polygon, Timeframe::OneHour)
            .await
            .unwrap();

        for sample in &series.samples {
            assert!(
                within_ranges(sample, &ranges),
                "sample out of bounds: {sample:?}"
            );
        }
    }

    #[tokio::test]
    async fn zero_probability_never_fails_one_always_does() {
        let reliable = instant_source(0.0);
        let broken = instant_source(1.0);
        for _ in 0..50 {
            assert!(
                reliable
                    .generate(Network::Bitcoin, Timeframe::SevenDays)
                    .await
                    .is_ok()
            );
            assert!(
                broken
                    .generate(Network::Bitcoin, Timeframe::SevenDays)
                    .await
                    .is_err()
            );
        }
    }

    #[tokio::test]
    async fn failure_rate_tracks_configured_probability() {
        let source = instant_source(0.1);
        let mut failures = 0u32;
        for _ in 0..1000 {
            if source
                .generate(Network::Avalanche, Timeframe::SevenDays)
                .await
                .is_err()
            {
                failures += 1;
            }
        }
        // 10% nominal; 7%-13% tolerance is > 3 sigma for 1000 draws.
        assert!(
            (70..=130).contains(&failures),
            "failure count {failures} outside statistical tolerance"
        );
    }
}
