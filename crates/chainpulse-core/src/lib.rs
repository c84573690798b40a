//! Data-refresh and derived-metric pipeline for the chainpulse dashboard.
//!
//! This crate owns everything with control flow in it; rendering lives in
//! `chainpulse-tui`, which only consumes the contracts exposed here:
//!
//! - **[`RefreshController`]** — The fetch lifecycle state machine.
//!   [`start()`](RefreshController::start) issues the initial fetch and
//!   spawns the periodic refresh task; selection changes and
//!   [`retry()`](RefreshController::retry) re-enter the same cycle. State is
//!   observable through a `tokio::sync::watch` channel and transitions are
//!   guarded by a monotonic request id, so a stale fetch can never
//!   overwrite the result of a newer one.
//!
//! - **[`SampleSource`]** / **[`SimulatedSource`]** — The generation seam
//!   and the shipped pseudo-random implementation, which shapes values by
//!   [`Timeframe`] and fails with a configured probability to simulate an
//!   unreliable upstream.
//!
//! - **[`derive`]** / **[`derive_all`]** — Pure percent-change math over
//!   the two most recent samples of a [`SampleSeries`].
//!
//! - **[`FetchState`]** — `Loading` / `Error` / `Ready` as a proper sum
//!   type; loading-and-error-at-once is unrepresentable.

pub mod config;
pub mod controller;
pub mod derive;
pub mod error;
pub mod generate;
pub mod model;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{FieldRanges, RefreshConfig};
pub use controller::RefreshController;
pub use derive::{DerivedMetric, Trend, derive, derive_all};
pub use error::CoreError;
pub use generate::{SampleSource, SimulatedSource};
pub use model::{
    FetchState, HealthSample, MetricField, Network, SampleSeries, Selection, Timeframe,
};
