//! Application configuration
//!
//! Configuration loaded from .gh-pr-downstream.toml file.

use serde::{Deserialize, Serialize};

/// GitHub caps list endpoints at 100 items per page
const MAX_PAGE_SIZE: u8 = 100;

/// Application configuration loaded from .gh-pr-downstream.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Label of the downstream pull requests node
    #[serde(default = "default_downstream_label")]
    pub downstream_label: String,

    /// Pull requests requested per API page
    #[serde(default = "default_page_size")]
    pub page_size: u8,

    /// Seconds between polls in watch mode
    #[serde(default = "default_watch_interval_secs")]
    pub watch_interval_secs: u64,
}

fn default_downstream_label() -> String {
    "Downstream Pull Requests".to_string()
}

fn default_page_size() -> u8 {
    30
}

fn default_watch_interval_secs() -> u64 {
    60
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            downstream_label: default_downstream_label(),
            page_size: default_page_size(),
            watch_interval_secs: default_watch_interval_secs(),
        }
    }
}

impl AppConfig {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        if let Some(content) = crate::load_config_file() {
            match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded app config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {}", e);
                }
            }
        }

        log::debug!("Using default app config");
        Self::default()
    }

    /// Page size clamped to what the API accepts
    pub fn effective_page_size(&self) -> u8 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}
