//! A single artifact to retrieve for a chosen version

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path};

/// One downloadable package file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadTarget {
    /// Absolute download URL
    pub url: String,
    /// File name as linked in the detail page
    pub file_name: String,
}

impl DownloadTarget {
    /// Creates a target by joining a directory URL and a linked file name
    pub fn new(directory_url: &str, file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        let url = format!("{}/{}", directory_url.trim_end_matches('/'), file_name);
        Self { url, file_name }
    }

    /// Whether `file_name` stays inside the directory it is joined to
    pub fn has_plain_file_name(&self) -> bool {
        is_plain_file_name(&self.file_name)
    }
}

/// A single normal path component: no separators, no `.` or `..`, not empty
pub fn is_plain_file_name(name: &str) -> bool {
    if name.contains('/') || name.contains('\\') {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

impl fmt::Display for DownloadTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_name)
    }
}
