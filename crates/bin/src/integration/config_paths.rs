//! Config file discovery.
//!
//! A `kowloon.toml` in the working directory wins; otherwise the
//! platform-specific config directory is used:
//! - Linux: `~/.config/kowloon/config.toml`
//! - macOS: `~/Library/Application Support/kowloon/config.toml`
//! - Windows: `%APPDATA%\kowloon\config.toml`

use std::path::{Path, PathBuf};

/// Config file name looked up in the working directory.
pub(crate) const LOCAL_CONFIG: &str = "kowloon.toml";

/// Get the platform config file path.
pub(crate) fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kowloon")
        .join("config.toml")
}

/// Resolve the config file to use, preferring an explicit path.
pub(crate) fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    let local = PathBuf::from(LOCAL_CONFIG);
    if local.exists() {
        local
    } else {
        default_config_path()
    }
}
