//! Logging configuration
//!
//! Logs go to stderr so replay output on stdout stays readable. Set
//! `DEBUG_LOGGING=1` to enable debug output for kwyd crates.

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Initialize stderr logging.
///
/// `verbose` has the same effect as `DEBUG_LOGGING`.
pub fn init(verbose: bool) {
    let debug_logging = verbose || std::env::var("DEBUG_LOGGING").is_ok();

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    let filter_directive = if debug_logging {
        // Debug for kwyd crates, warn for dependencies
        "warn,kwyd=debug,kwyd_core=debug,kwyd_cli=debug"
    } else {
        "warn,kwyd=info,kwyd_core=info,kwyd_cli=info"
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(EnvFilter::new(filter_directive))
        .init();

    tracing::debug!(debug_logging, "KWYD logging initialized");
}
