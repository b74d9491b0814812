//! Console logging for the `roadtiles` binary.
//!
//! The library only emits `tracing` events; installing a subscriber is
//! left to the binary. The filter defaults to `info` and can be overridden
//! through `RUST_LOG`.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Default filter directive when `RUST_LOG` is not set.
pub fn default_filter() -> &'static str {
    "info"
}

/// Builds the env filter, falling back to [`default_filter`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter()))
}

/// Installs a global fmt subscriber writing to stderr.
///
/// Calling this twice is harmless; the second call is ignored.
pub fn init_logging() {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init();
}
