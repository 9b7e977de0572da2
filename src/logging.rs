//! logging
//!
//! Diagnostic tracing for gitquest.
//!
//! Tracing is for diagnostics only and goes to stderr. Learner-facing
//! output goes through [`crate::ui::output`].

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither `--debug` nor `RUST_LOG` is given.
pub const DEFAULT_FILTER: &str = "warn";

/// Filter used for `--debug`.
pub const DEBUG_FILTER: &str = "gitquest=debug";

/// Pick the filter: `--debug` wins, then `RUST_LOG`, then `warn`.
pub fn filter(debug: bool) -> EnvFilter {
    if debug {
        return EnvFilter::new(DEBUG_FILTER);
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber: stderr, compact format.
///
/// Calling this more than once keeps the first subscriber.
pub fn init(debug: bool) {
    let _ = tracing_subscriber::registry()
        .with(filter(debug))
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
