//! # Logging Module
//!
//! This module provides centralized logging functionality for logsink.
//! It installs the `tracing` subscriber and defines the API error type,
//! whose failures are always written to the log before they reach a client.
//!
//! ## Features
//!
//! - **Env Filter**: Verbosity comes from `LOGSINK_LOG_LEVEL` or `RUST_LOG`
//! - **Error Logging**: Handler failures are logged with the operation name
//! - **Uniform Error Bodies**: Every failure is rendered as `{"error": "..."}`

pub mod errors;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// An unparseable filter falls back to `info`. Calling this twice is harmless.
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_tolerates_bad_filter_and_reinit() {
        init_tracing("logsink=[");
        init_tracing("logsink=debug");
    }
}
