//! Catalog parser for the top-level mainline index
//!
//! Rows are read in document order; the index is requested sorted newest
//! first and is not re-sorted here.

use super::table::first_table_rows;
use crate::domain::{VersionEntry, LAST_MODIFIED_FORMAT};
use crate::error::CatalogError;
use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, trace};

/// Number of versions offered to the operator
pub const DEFAULT_MAX_VERSIONS: usize = 10;

// Build folder: v<major>[.<minor>][.<patch>][-][rc<N>]/
static VERSION_FOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v(\d+(?:\.\d+)?(?:\.\d+)?-?(?:rc\d+)?)/$").unwrap());

// YYYY-MM-DD HH:MM, month and day may be unpadded
static LAST_MODIFIED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-(?:0[1-9]|1[0-2]|[1-9])-(?:0[1-9]|[12]\d|3[01]|[1-9]) \d{1,2}:\d{2}$")
        .unwrap()
});

/// Parse the catalog page into at most `max` entries.
///
/// Rows without data cells are skipped, rows failing either pattern are
/// dropped, and a data row with fewer than three cells is a structural error.
pub fn parse_catalog(
    markup: &str,
    page: &str,
    max: usize,
) -> Result<Vec<VersionEntry>, CatalogError> {
    let rows = first_table_rows(markup, page)?;
    let mut entries = Vec::with_capacity(max);

    for (index, row) in rows.iter().enumerate() {
        if entries.len() >= max {
            break;
        }
        if !row.is_data_row() {
            continue;
        }

        let raw_version = &row
            .cell(1)
            .ok_or_else(|| CatalogError::missing_cell(page, index, 1))?
            .text;
        let raw_last_modified = &row
            .cell(2)
            .ok_or_else(|| CatalogError::missing_cell(page, index, 2))?
            .text;

        let (Some(version), Some(last_modified)) = (
            parse_version_folder(raw_version),
            parse_last_modified(raw_last_modified),
        ) else {
            trace!(row = index, %raw_version, %raw_last_modified, "skipping row");
            continue;
        };

        entries.push(VersionEntry::new(version, last_modified));
    }

    debug!(count = entries.len(), page, "parsed catalog");
    Ok(entries)
}

/// Extract the version from a build folder name (`v6.9-rc1/` → `6.9-rc1`)
pub fn parse_version_folder(raw: &str) -> Option<&str> {
    VERSION_FOLDER_RE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parse a "Last modified" cell
pub fn parse_last_modified(raw: &str) -> Option<NaiveDateTime> {
    if !LAST_MODIFIED_RE.is_match(raw) {
        return None;
    }
    NaiveDateTime::parse_from_str(raw, LAST_MODIFIED_FORMAT).ok()
}
