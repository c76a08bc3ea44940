//! Configuration and file locations for gh-pr-downstream
//!
//! This crate provides:
//! - Config and cache directory paths
//! - Configuration file lookup (TOML)
//! - Application configuration (AppConfig)

pub mod app_config;
pub mod config_file;
pub mod paths;

pub use app_config::AppConfig;
pub use config_file::load_config_file;
pub use paths::{app_config_location, cache_dir};
