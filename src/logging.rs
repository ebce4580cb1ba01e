//! Logging initialization built on `tracing`.
//!
//! Verbosity maps to levels: default warn, `-v` info, `-vv` debug, `-q`
//! errors only. `CKL_LOG` overrides everything with a full env-filter
//! directive.

use crate::error::Result;
use std::io;
use tracing_subscriber::EnvFilter;

/// Initialize logging for the CLI.
///
/// # Errors
///
/// Returns an error if a global subscriber is already set.
pub fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    let filter = if let Ok(directive) = std::env::var("CKL_LOG") {
        EnvFilter::new(directive)
    } else {
        let level = if quiet {
            "error"
        } else {
            match verbose {
                0 => "warn",
                1 => "info",
                _ => "debug",
            }
        };
        EnvFilter::new(level)
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| crate::error::ChecklistError::Config(format!("logging init failed: {e}")))?;

    Ok(())
}

/// Initialize logging for tests, capturing output per test.
///
/// Safe to call repeatedly; only the first call installs a subscriber.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
