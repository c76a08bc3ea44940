//! Configuration and data directory paths
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/gh-pr-downstream/`, `~/.cache/gh-pr-downstream/`
//! - macOS: `~/Library/Application Support/gh-pr-downstream/`, `~/Library/Caches/gh-pr-downstream/`
//! - Windows: `%APPDATA%\gh-pr-downstream\`, `%LOCALAPPDATA%\gh-pr-downstream\`

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "gh-pr-downstream";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Get the application cache directory, creating it if needed
///
/// Release builds write their log files here.
pub fn cache_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir().context("Could not determine cache directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Where the app config file lives inside the config directory
///
/// Nothing is created; the file is optional.
pub fn app_config_location() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join(APP_NAME).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_dir_exists() {
        let dir = cache_dir().unwrap();
        assert!(dir.exists());
        assert!(dir.ends_with(APP_NAME));
    }

    #[test]
    fn test_app_config_location() {
        let path = app_config_location().unwrap();
        assert!(path.ends_with("gh-pr-downstream/config.toml"));
    }
}
