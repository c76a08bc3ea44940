//! Logging for the tree
//!
//! Tree nodes log through an injected [`OutputLogger`] tagged with a
//! component name. [`LogOutput`] forwards those lines to the `log` facade,
//! which the binary points at a file via simplelog.
//!
//! Log file location depends on build type:
//! - Debug builds: current working directory (for development convenience)
//! - Release builds: cache directory (~/.cache/gh-pr-downstream/ on Linux)

use anyhow::{Context, Result};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

/// Component tag for pull request tree messages
pub const PR_TREE: &str = "PR Tree";

/// Line-oriented logging capability handed to tree nodes
pub trait OutputLogger: Send + Sync {
    /// Append an informational line for `component`
    fn append_line(&self, message: &str, component: &str);

    /// Append a warning line for `component`
    fn warn(&self, message: &str, component: &str) {
        self.append_line(message, component);
    }
}

/// Forwards output lines to the `log` facade, using the component as target
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOutput;

impl OutputLogger for LogOutput {
    fn append_line(&self, message: &str, component: &str) {
        log::info!(target: component, "{}", message);
    }

    fn warn(&self, message: &str, component: &str) {
        log::warn!(target: component, "{}", message);
    }
}

/// Get the log file path based on build type
fn log_file_path() -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let filename = format!("gh-pr-downstream-{}.log", timestamp);

    if cfg!(debug_assertions) {
        PathBuf::from(filename)
    } else {
        gh_pr_config::cache_dir()
            .map(|dir| dir.join(&filename))
            .unwrap_or_else(|_| PathBuf::from(filename))
    }
}

/// Parse a `RUST_LOG`-style level, defaulting to Info for unknown values
fn parse_level(value: &str) -> LevelFilter {
    match value.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Initialize file-based logging
///
/// Creates a log file with timestamp and returns its path.
pub fn init() -> Result<PathBuf> {
    let log_file = log_file_path();

    let level = std::env::var("RUST_LOG")
        .map(|v| parse_level(&v))
        .unwrap_or(LevelFilter::Debug);

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_time_offset_to_local()
        .unwrap_or_else(|c| c) // Fallback if local time offset fails
        .build();

    let file = File::create(&log_file)
        .with_context(|| format!("Failed to create log file {}", log_file.display()))?;

    WriteLogger::init(level, config, file).context("Failed to initialize logger")?;

    Ok(log_file)
}
