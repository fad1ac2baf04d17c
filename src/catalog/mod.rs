//! Parsing of the upstream mainline index pages
//!
//! This module provides:
//! - Extraction of the first table of an index page into owned rows
//! - The catalog parser turning the top-level listing into version entries
//! - The detail resolver turning a version's listing into download targets

mod detail;
mod listing;
mod table;

pub use detail::{resolve_targets, MatchStrategy, PACKAGE_ROWS};
pub use listing::{parse_catalog, parse_last_modified, parse_version_folder, DEFAULT_MAX_VERSIONS};
pub use table::{first_table_rows, Cell, Row};
