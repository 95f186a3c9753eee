//! Logging infrastructure for the parameter store.
//!
//! This module provides:
//! - Global `tracing` subscriber setup for the hosting application
//! - A diagnostic sink that mirrors store messages to a host callback
//!   (e.g. a controller console)
//!
//! # Example
//!
//! ```no_run
//! use room_config::logging::{init_tracing, LogLevel};
//!
//! init_tracing(LogLevel::Debug);
//! ```

mod diagnostics;
mod types;

pub use diagnostics::Diagnostics;
pub use types::{LogLevel, MessagePrefix, SinkCallback};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize global tracing subscriber for application-wide logging.
///
/// This sets up a subscriber that:
/// - Respects RUST_LOG environment variable
/// - Falls back to the provided default level
/// - Outputs to stderr with timestamps
///
/// Returns false when a global subscriber was already installed; the
/// existing one is kept.
pub fn init_tracing(default_level: LogLevel) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_to_filter_str(default_level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .try_init()
        .is_ok()
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

fn level_to_filter_str(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}
