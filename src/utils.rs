//! Shared utility functions for file locations.
//!
//! These functions are reused across the CLI and TUI interfaces.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Gets the cross-platform log file path used while the TUI owns the terminal.
///
/// Returns the path as `{data_local_dir}/qask/qask.log` where `data_local_dir` is:
/// - Linux: `~/.local/share`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Local`
///
/// # Errors
///
/// Returns an error if the data directory cannot be determined.
pub fn get_log_path() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Failed to determine data directory"))?;

    Ok(data_dir.join("qask").join("qask.log"))
}

/// Ensures the parent directory of a file exists.
///
/// Creates the directory structure if it doesn't exist using `create_dir_all`.
///
/// # Errors
///
/// Returns an error if directory creation fails.
pub fn ensure_parent_directory(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

/// Parses a `--meta` argument into a JSON object.
///
/// # Errors
///
/// Returns an error if the input is not valid JSON or not an object.
pub fn parse_meta(input: &str) -> Result<serde_json::Map<String, serde_json::Value>> {
    let value: serde_json::Value =
        serde_json::from_str(input).context("Metadata must be valid JSON")?;

    match value {
        serde_json::Value::Object(map) => Ok(map),
        _ => anyhow::bail!("Metadata must be a JSON object"),
    }
}
