//! JSON output formatter for machine processing

use crate::domain::{DownloadTarget, HostKernelVersion, VersionEntry};
use crate::output::OutputFormatter;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// JSON formatter for machine-readable output
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self
    }
}

/// JSON representation of the catalog listing
#[derive(Serialize)]
struct JsonCatalog<'a> {
    /// Running kernel, when it was detected
    #[serde(skip_serializing_if = "Option::is_none")]
    host_kernel: Option<&'a str>,
    /// Versions in upstream order
    versions: Vec<JsonVersion<'a>>,
}

#[derive(Serialize)]
struct JsonVersion<'a> {
    index: usize,
    #[serde(flatten)]
    entry: &'a VersionEntry,
}

/// JSON representation of a download plan
#[derive(Serialize)]
struct JsonPlan<'a> {
    version: &'a str,
    staging_dir: String,
    targets: &'a [DownloadTarget],
}

fn to_io(e: serde_json::Error) -> std::io::Error {
    std::io::Error::other(e)
}

impl OutputFormatter for JsonFormatter {
    fn format_catalog(
        &self,
        entries: &[VersionEntry],
        host: Option<&HostKernelVersion>,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let catalog = JsonCatalog {
            host_kernel: host.map(HostKernelVersion::as_str),
            versions: entries
                .iter()
                .enumerate()
                .map(|(index, entry)| JsonVersion { index, entry })
                .collect(),
        };
        serde_json::to_writer_pretty(&mut *writer, &catalog).map_err(to_io)?;
        writeln!(writer)
    }

    fn format_plan(
        &self,
        entry: &VersionEntry,
        staging_dir: &Path,
        targets: &[DownloadTarget],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let plan = JsonPlan {
            version: &entry.version,
            staging_dir: staging_dir.display().to_string(),
            targets,
        };
        serde_json::to_writer_pretty(&mut *writer, &plan).map_err(to_io)?;
        writeln!(writer)
    }
}
