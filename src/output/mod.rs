//! Output formatting for catalog listings and download plans
//!
//! This module provides:
//! - Text output for the interactive console
//! - JSON output for scripting (`--list --json`, `--dry-run --json`)

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::{failure_line, success_line, TextFormatter};

use crate::domain::{DownloadTarget, HostKernelVersion, VersionEntry};
use std::io::Write;
use std::path::Path;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for machine processing
    Json,
}

/// Configuration for output formatting
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Output format (text, json)
    pub format: OutputFormat,
    /// Whether to use colors (when supported)
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            color: true,
        }
    }
}

impl OutputConfig {
    /// Create configuration from CLI arguments
    pub fn from_cli(json: bool, no_color: bool) -> Self {
        let format = if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };
        Self {
            format,
            color: !no_color,
        }
    }
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Write the available versions, and the host kernel when known
    fn format_catalog(
        &self,
        entries: &[VersionEntry],
        host: Option<&HostKernelVersion>,
        writer: &mut dyn Write,
    ) -> std::io::Result<()>;

    /// Write what would be downloaded for a version, and where
    fn format_plan(
        &self,
        entry: &VersionEntry,
        staging_dir: &Path,
        targets: &[DownloadTarget],
        writer: &mut dyn Write,
    ) -> std::io::Result<()>;
}

/// Create an output formatter based on configuration
pub fn create_formatter(config: OutputConfig) -> Box<dyn OutputFormatter> {
    match config.format {
        OutputFormat::Text => Box::new(TextFormatter::with_color(config.color)),
        OutputFormat::Json => Box::new(JsonFormatter::new()),
    }
}
