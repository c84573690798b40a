//! Shared configuration for the chainpulse dashboard.
//!
//! TOML file + `CHAINPULSE_*` environment layering via figment, translated
//! into the core's [`RefreshConfig`] and initial [`Selection`]. Malformed
//! network/timeframe names are rejected here, at the selection boundary --
//! the core's enums never see an invalid value.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use chainpulse_core::{FieldRanges, Network, RefreshConfig, Selection, Timeframe};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Refresh policy and simulated-source tuning.
    #[serde(default)]
    pub refresh: RefreshSection,

    /// Initial dashboard selection.
    #[serde(default)]
    pub dashboard: DashboardSection,

    /// Per-field draw ranges for the simulated source. Demonstration
    /// constants -- override only when pointing the dashboard at a source
    /// with different bounds.
    #[serde(default)]
    pub ranges: FieldRanges,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RefreshSection {
    /// Periodic re-fetch interval in seconds. Zero disables the timer.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Probability in [0, 1] that a fetch fails.
    #[serde(default = "default_failure_probability")]
    pub failure_probability: f64,

    /// Simulated upstream latency in milliseconds.
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
}

impl Default for RefreshSection {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            failure_probability: default_failure_probability(),
            latency_ms: default_latency_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct DashboardSection {
    /// Network shown on startup.
    #[serde(default = "default_network")]
    pub network: Network,

    /// Timeframe shown on startup.
    #[serde(default)]
    pub timeframe: Timeframe,
}

impl Default for DashboardSection {
    fn default() -> Self {
        Self {
            network: default_network(),
            timeframe: Timeframe::default(),
        }
    }
}

fn default_interval_secs() -> u64 {
    300
}
fn default_failure_probability() -> f64 {
    0.1
}
fn default_latency_ms() -> u64 {
    1000
}
fn default_network() -> Network {
    Network::Ethereum
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "chainpulse", "chainpulse").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("chainpulse");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load a Config from an explicit file path + environment.
///
/// Missing file is fine (defaults apply); present-but-invalid values are
/// errors, including unknown network/timeframe names.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("CHAINPULSE_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning defaults if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Translation to core types ───────────────────────────────────────

/// Build the core's [`RefreshConfig`] from a loaded [`Config`].
pub fn to_refresh_config(cfg: &Config) -> Result<RefreshConfig, ConfigError> {
    let refresh = RefreshConfig {
        refresh_interval: Duration::from_secs(cfg.refresh.interval_secs),
        failure_probability: cfg.refresh.failure_probability,
        latency: Duration::from_millis(cfg.refresh.latency_ms),
        ranges: cfg.ranges.clone(),
    };

    refresh.validate().map_err(|e| ConfigError::Validation {
        field: "refresh.failure_probability".into(),
        reason: e.to_string(),
    })?;

    Ok(refresh)
}

/// The initial dashboard selection from a loaded [`Config`].
pub fn initial_selection(cfg: &Config) -> Selection {
    Selection {
        network: cfg.dashboard.network,
        timeframe: cfg.dashboard.timeframe,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("nope.toml")).unwrap();

        assert_eq!(cfg.refresh.interval_secs, 300);
        assert_eq!(cfg.refresh.failure_probability, 0.1);
        assert_eq!(cfg.dashboard.network, Network::Ethereum);
        assert_eq!(cfg.dashboard.timeframe, Timeframe::TwentyFourHours);
    }

    #[test]
    fn file_values_are_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            [refresh]
            interval_secs = 60
            latency_ms = 0

            [dashboard]
            network = "solana"
            timeframe = "7d"
            "#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.refresh.interval_secs, 60);
        assert_eq!(cfg.refresh.latency_ms, 0);
        assert_eq!(cfg.dashboard.network, Network::Solana);
        assert_eq!(cfg.dashboard.timeframe, Timeframe::SevenDays);
        // Untouched sections keep their defaults.
        assert_eq!(cfg.refresh.failure_probability, 0.1);
    }

    #[test]
    fn unknown_network_is_rejected_at_the_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[dashboard]\nnetwork = \"dogecoin\"\n").unwrap();

        assert!(load_config_from(&path).is_err());
    }

    #[test]
    fn env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                "[refresh]\ninterval_secs = 60\n",
            )?;
            jail.set_env("CHAINPULSE_REFRESH__INTERVAL_SECS", "30");

            let cfg = load_config_from(Path::new("config.toml")).expect("load");
            assert_eq!(cfg.refresh.interval_secs, 30);
            Ok(())
        });
    }

    #[test]
    fn out_of_range_probability_fails_translation() {
        let cfg = Config {
            refresh: RefreshSection {
                failure_probability: 2.0,
                ..RefreshSection::default()
            },
            ..Config::default()
        };

        assert!(matches!(
            to_refresh_config(&cfg),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn translation_carries_every_field() {
        let cfg = Config::default();
        let refresh = to_refresh_config(&cfg).unwrap();

        assert_eq!(refresh.refresh_interval, Duration::from_secs(300));
        assert_eq!(refresh.latency, Duration::from_millis(1000));
        assert_eq!(refresh.ranges, FieldRanges::default());

        let sel = initial_selection(&cfg);
        assert_eq!(sel.network, Network::Ethereum);
        assert_eq!(sel.timeframe, Timeframe::TwentyFourHours);
    }
}
