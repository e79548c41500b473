use mediflow_core::config::ClientConfig;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs the global subscriber: an `fmt` layer filtered by `RUST_LOG`, or
/// by the configured `log_level` when `RUST_LOG` is unset or invalid.
///
/// Returns `false` if a subscriber was already installed.
pub fn init_tracing(config: &ClientConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .try_init()
        .is_ok()
}
