//! Human-readable metric formatting helpers.
//!
//! All display formatting lives here -- the core hands over raw numbers
//! only.

use chainpulse_core::{MetricField, Timeframe};
use chrono::{DateTime, Utc};

/// Format a magnitude into a compact human-readable string (e.g. "1.2M",
/// "450.0K", "12.5").
pub fn fmt_compact(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1_000_000_000.0 {
        format!("{:.2}B", value / 1_000_000_000.0)
    } else if abs >= 1_000_000.0 {
        format!("{:.2}M", value / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        format!("{value:.1}")
    }
}

/// Compact magnitude for chart Y-axis labels: "120K", "1.2M".
pub fn fmt_axis(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1_000_000_000.0 {
        format!("{:.1}B", value / 1_000_000_000.0)
    } else if abs >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.0}K", value / 1_000.0)
    } else {
        format!("{value:.0}")
    }
}

/// Format one metric value with its field-appropriate unit.
pub fn fmt_metric(field: MetricField, value: f64) -> String {
    match field {
        MetricField::ActiveAddresses | MetricField::TransactionCount | MetricField::Difficulty => {
            fmt_compact(value)
        }
        MetricField::AverageBlockTime => format!("{value:.1}s"),
        MetricField::NetworkHashRate => fmt_hash_rate(value),
        MetricField::Fees => format!("{value:.2}"),
    }
}

/// Format a hash rate in H/s with a binary-free SI suffix.
pub fn fmt_hash_rate(hashes_per_sec: f64) -> String {
    let abs = hashes_per_sec.abs();
    if abs >= 1e12 {
        format!("{:.1} TH/s", hashes_per_sec / 1e12)
    } else if abs >= 1e9 {
        format!("{:.1} GH/s", hashes_per_sec / 1e9)
    } else if abs >= 1e6 {
        format!("{:.1} MH/s", hashes_per_sec / 1e6)
    } else if abs >= 1e3 {
        format!("{:.1} KH/s", hashes_per_sec / 1e3)
    } else {
        format!("{hashes_per_sec:.0} H/s")
    }
}

/// Signed percent-change string: "+20.0%", "-3.2%".
pub fn fmt_percent(percent: f64) -> String {
    format!("{percent:+.1}%")
}

/// Chart X-axis label for an epoch-millisecond timestamp: time of day for
/// intraday windows, calendar date for multi-day ones.
pub fn fmt_timestamp(timestamp_ms: i64, timeframe: Timeframe) -> String {
    let Some(ts) = DateTime::<Utc>::from_timestamp_millis(timestamp_ms) else {
        return String::from("--");
    };
    match timeframe {
        Timeframe::OneHour | Timeframe::TwentyFourHours => ts.format("%H:%M").to_string(),
        Timeframe::SevenDays | Timeframe::ThirtyDays => ts.format("%b %d").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn compact_scales_by_magnitude() {
        assert_eq!(fmt_compact(12.34), "12.3");
        assert_eq!(fmt_compact(4_500.0), "4.5K");
        assert_eq!(fmt_compact(123_456.0), "123.5K");
        assert_eq!(fmt_compact(420_000_000.0), "420.00M");
        assert_eq!(fmt_compact(1_250_000_000.0), "1.25B");
    }

    #[test]
    fn axis_labels_are_terse() {
        assert_eq!(fmt_axis(0.0), "0");
        assert_eq!(fmt_axis(120_000.0), "120K");
        assert_eq!(fmt_axis(1_200_000.0), "1.2M");
    }

    #[test]
    fn metric_units_follow_the_field() {
        assert_eq!(fmt_metric(MetricField::AverageBlockTime, 12.34), "12.3s");
        assert_eq!(fmt_metric(MetricField::Fees, 5.5), "5.50");
        assert_eq!(
            fmt_metric(MetricField::NetworkHashRate, 120_000_000.0),
            "120.0 MH/s"
        );
        assert_eq!(
            fmt_metric(MetricField::ActiveAddresses, 120_000.0),
            "120.0K"
        );
    }

    #[test]
    fn percent_keeps_its_sign() {
        assert_eq!(fmt_percent(20.0), "+20.0%");
        assert_eq!(fmt_percent(-3.21), "-3.2%");
        assert_eq!(fmt_percent(0.0), "+0.0%");
    }

    #[test]
    fn timestamps_format_by_window() {
        // 2024-03-01 14:05:00 UTC
        let ms = 1_709_301_900_000;
        assert_eq!(fmt_timestamp(ms, Timeframe::OneHour), "14:05");
        assert_eq!(fmt_timestamp(ms, Timeframe::ThirtyDays), "Mar 01");
    }
}
