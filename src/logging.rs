//! Structured logging for lectio using the tracing crate.
//!
//! The core itself only emits `tracing` events; this helper is for hosts
//! (and integration tests) that want a ready-made subscriber. Log level is
//! controlled by the RUST_LOG environment variable (defaults to "info").

use tracing_subscriber::prelude::*;

/// Initializes a fmt subscriber for the process.
///
/// # Errors
/// - If a global subscriber has already been installed
pub fn init_logging() -> Result<(), anyhow::Error> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_level(true),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Logging already initialized: {e}"))?;

    Ok(())
}
