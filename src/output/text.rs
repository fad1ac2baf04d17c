//! Text output formatter for the interactive console
//!
//! This module provides:
//! - The version table with index, version and last-modified columns
//! - The emphasized host kernel line
//! - Dry-run plan and final result lines

use crate::domain::{DownloadTarget, HostKernelVersion, VersionEntry};
use crate::output::OutputFormatter;
use colored::Colorize;
use std::io::Write;
use std::path::Path;

const INDEX_HEADER: &str = "index";
const VERSION_HEADER: &str = "version";
const LAST_MODIFIED_HEADER: &str = "last modified";

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new() -> Self {
        Self { color: true }
    }

    /// Create a new text formatter with color option
    pub fn with_color(color: bool) -> Self {
        Self { color }
    }

    fn bold(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn dimmed(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    /// Host kernel line, e.g. "Your kernel version: 6.8.0-31-generic"
    pub fn host_line(&self, host: &HostKernelVersion) -> String {
        format!("Your kernel version: {}", self.bold(host.as_str()))
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TextFormatter {
    fn format_catalog(
        &self,
        entries: &[VersionEntry],
        host: Option<&HostKernelVersion>,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let version_width = entries
            .iter()
            .map(|e| e.version.len())
            .max()
            .unwrap_or(0)
            .max(VERSION_HEADER.len());
        let index_width = INDEX_HEADER.len();

        // Pad before styling so escape codes do not skew the columns
        writeln!(
            writer,
            "{}  {}  {}",
            self.bold(&format!("{:<index_width$}", INDEX_HEADER)),
            self.bold(&format!("{:<version_width$}", VERSION_HEADER)),
            self.bold(LAST_MODIFIED_HEADER),
        )?;

        for (index, entry) in entries.iter().enumerate() {
            let version = format!("{:<version_width$}", entry.version);
            let version = if entry.is_release_candidate() {
                self.dimmed(&version)
            } else {
                version
            };
            writeln!(
                writer,
                "{:<index_width$}  {}  {}",
                index,
                version,
                entry.last_modified_display()
            )?;
        }

        if let Some(host) = host {
            writeln!(writer)?;
            writeln!(writer, "{}", self.host_line(host))?;
        }
        Ok(())
    }

    fn format_plan(
        &self,
        entry: &VersionEntry,
        staging_dir: &Path,
        targets: &[DownloadTarget],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        writeln!(
            writer,
            "Would download {} package(s) for {} into {}",
            targets.len(),
            self.bold(&entry.version),
            staging_dir.display()
        )?;
        for target in targets {
            writeln!(writer, "  {}", target.file_name)?;
            writeln!(writer, "    {}", self.dimmed(&target.url))?;
        }
        Ok(())
    }
}

/// Final line after a successful run
pub fn success_line() -> String {
    "Succeed ✨".to_string()
}

/// Final line after a failed run
pub fn failure_line(message: &str) -> String {
    format!("{} {} 💣", "Error:".red().bold(), message)
}
