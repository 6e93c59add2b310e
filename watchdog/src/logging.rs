//! Diagnostic tracing for the supervisor.
//!
//! Events go to stderr so they interleave with, but never replace, the child's
//! inherited output. Nothing is persisted.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing subscriber.
///
/// Reads `RUST_LOG` env var. Defaults to `warn` if unset, which reports only
/// non-zero child exits and launch failures.
///
/// # Example
/// ```bash
/// RUST_LOG=watchdog=info watchdog run --program ./app --workdir /opt/app
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
