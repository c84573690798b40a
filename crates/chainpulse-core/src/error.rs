// ── Core error types ──
//
// User-facing errors from chainpulse-core. The generation variant is the
// only error that can reach a running controller -- it is caught at the
// fetch boundary and surfaced as `FetchState::Error`, never thrown past it.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The sample source failed to produce a series. Always retryable.
    #[error("sample generation failed: {message}")]
    Generation { message: String },

    /// Rejected configuration (e.g. failure probability outside [0, 1]).
    #[error("invalid configuration: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Shorthand for a generation failure with the given message.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }
}
