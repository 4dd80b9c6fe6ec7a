//! Logging setup for the binary.
//!
//! The library only emits `tracing` events; the subscriber is chosen here.
//! Filtering follows the `QASK_LOG` environment variable (an `EnvFilter`
//! directive such as `qask=debug`).

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "QASK_LOG";

fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Installs a subscriber writing to stderr, used by the one-shot commands.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_stderr(default_directive: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_directive))
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}

/// Installs a subscriber appending to `path`, used while the TUI owns the terminal.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a subscriber is already installed.
pub fn init_file(path: &Path, default_directive: &str) -> Result<()> {
    crate::utils::ensure_parent_directory(path)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_directive))
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}
