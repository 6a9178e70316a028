//! Logging setup
//!
//! Logs go to stderr so `extract --stdin` can keep stdout for the link.

use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

/// Resolve the filter level: `--verbose` wins over the configured level
///
/// `--log-level` reaches the config through `ConfigOverrides`.
pub fn resolve_level(verbose: bool, config_level: &str) -> String {
    if verbose {
        LogLevel::Debug.as_str().to_string()
    } else {
        config_level.to_string()
    }
}

/// Build the env filter for our crates at `level`
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(format!(
        "splinter_cli={level},splinter_core={level},splinter_config={level}"
    ))
    .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber
pub fn init(level: &str) {
    // A subscriber may already be installed (e.g. by a test harness)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
