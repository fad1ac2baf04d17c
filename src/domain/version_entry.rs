//! Catalog entry for a published mainline build
//!
//! One `VersionEntry` corresponds to one accepted row of the upstream
//! index table.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Format of the "Last modified" column on the upstream index
pub const LAST_MODIFIED_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A kernel build listed in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEntry {
    /// Version without the folder decoration (e.g., "6.9" or "6.9-rc1")
    pub version: String,
    /// When the build folder was last modified upstream
    pub last_modified: NaiveDateTime,
}

impl VersionEntry {
    /// Create a new VersionEntry
    pub fn new(version: impl Into<String>, last_modified: NaiveDateTime) -> Self {
        Self {
            version: version.into(),
            last_modified,
        }
    }

    /// Returns true for release candidates
    pub fn is_release_candidate(&self) -> bool {
        self.version.contains("rc")
    }

    /// Last modified time rendered the way the upstream index shows it
    pub fn last_modified_display(&self) -> String {
        self.last_modified.format(LAST_MODIFIED_FORMAT).to_string()
    }
}

impl fmt::Display for VersionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.version)
    }
}
