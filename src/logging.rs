// ==========================================
// Logging setup
// ==========================================
// tracing + tracing-subscriber, level from RUST_LOG,
// output format from RUST_LOG_FORMAT
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// Output format switch: "json" selects JSON lines, anything else is text
pub const LOG_FORMAT_ENV: &str = "RUST_LOG_FORMAT";

fn wants_json(format: Option<&str>) -> bool {
    format
        .map(|f| f.trim().eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Pick `init` or `init_json` from RUST_LOG_FORMAT
pub fn init_from_env() {
    let format = std::env::var(LOG_FORMAT_ENV).ok();
    if wants_json(format.as_deref()) {
        init_json();
    } else {
        init();
    }
}

/// Initialize the global subscriber
///
/// # Environment
/// - RUST_LOG: level filter (default: info)
///   e.g. RUST_LOG=debug or RUST_LOG=dupa_estimator=trace
///
/// # Example
/// ```no_run
/// use dupa_estimator::logging;
/// logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// JSON lines output, for log shipping
pub fn init_json() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(true)
        .init();
}

/// Test subscriber: debug level, captured by the test harness.
/// Safe to call more than once.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
