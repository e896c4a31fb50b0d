use crate::config::Settings;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize tracing for a test run.
///
/// `RUST_LOG` wins over `default_filter`. Returns false if a global
/// subscriber was already installed, which is normal when several tests in
/// one binary call this.
pub fn init_tracing(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_test_writer()
        .try_init()
        .is_ok()
}

/// Initialize tracing with the filter from `settings`
pub fn init_tracing_from(settings: &Settings) -> bool {
    init_tracing(&settings.log_filter)
}
