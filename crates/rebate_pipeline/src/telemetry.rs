// Rust guideline compliant 2026-03-08

//! Tracing subscriber setup for the pipeline binary.
//!
//! `RUST_LOG` takes precedence; otherwise the supplied default filter
//! applies. Initialized exactly once, before any pipeline work.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

/// Errors raised while initializing telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The fallback filter string is not a valid `EnvFilter`.
    #[error("invalid log filter '{value}': unable to build EnvFilter")]
    EnvFilter {
        /// The rejected filter string.
        value: String,
        /// Parse failure reported by tracing-subscriber.
        source: ParseError,
    },
    /// A global subscriber was already installed.
    #[error("telemetry error: {0}")]
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

/// Install the global tracing subscriber.
///
/// # Errors
///
/// Returns [`TelemetryError::EnvFilter`] when `default_filter` does not
/// parse, or [`TelemetryError::Subscriber`] when a subscriber is already
/// registered.
pub fn init(default_filter: &str) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter).map_err(|source| {
            TelemetryError::EnvFilter { value: default_filter.to_owned(), source }
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(TelemetryError::Subscriber)
}
