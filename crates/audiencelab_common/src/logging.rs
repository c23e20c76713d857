//! Logging utilities for the AudienceLab SDK.
//!
//! The SDK itself only emits `tracing` events; installing a subscriber is the
//! host's choice. These helpers set one up for binaries and tests that want
//! the standard format.

use audiencelab_config::SdkConfig;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber at INFO.
///
/// # Examples
///
/// ```
/// use audiencelab_common::logging;
///
/// logging::init();
/// // Repeated initialization is a no-op.
/// logging::init_with_level(tracing::Level::DEBUG);
/// ```
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber using `log_level` from the configuration.
///
/// Unknown level names fall back to INFO.
pub fn init_from_config(config: &SdkConfig) {
    let level = config.log_level.parse::<Level>().unwrap_or(Level::INFO);
    init_with_level(level);
}

/// Initialize the tracing subscriber with a specific log level.
///
/// `RUST_LOG` directives still apply; the level is added as an
/// `audiencelab=<level>` directive on top of them.
pub fn init_with_level(level: Level) {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("audiencelab={}", level).parse() {
        filter = filter.add_directive(directive);
    }

    // try_init: a global subscriber may already be installed by the host
    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

/// Log an error with context at the ERROR level.
pub fn log_error<E: std::fmt::Display>(error: E, context: &str) {
    error!("{}: {}", context, error);
}
