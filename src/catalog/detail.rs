//! Version detail resolver
//!
//! Turns a version's architecture listing into the package files to fetch.

use super::table::{first_table_rows, Row};
use crate::domain::{is_plain_file_name, DownloadTarget, PackageRole};
use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Rows (0-based, every `<tr>` in document order) holding the generic amd64
/// package set on the upstream detail page
pub const PACKAGE_ROWS: [usize; 4] = [6, 7, 8, 9];

/// How package files are picked out of a detail listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStrategy {
    /// Take the links at the fixed `PACKAGE_ROWS`, whatever their names
    #[default]
    Positional,
    /// Classify every link by file name and take one per `PackageRole`
    ByRole,
}

/// Resolve the download targets listed on a detail page.
///
/// `page_url` is both the error label and the directory the links are
/// relative to.
pub fn resolve_targets(
    markup: &str,
    page_url: &str,
    strategy: MatchStrategy,
) -> Result<Vec<DownloadTarget>, CatalogError> {
    let rows = first_table_rows(markup, page_url)?;
    let targets = match strategy {
        MatchStrategy::Positional => by_position(&rows, page_url)?,
        MatchStrategy::ByRole => by_role(&rows, page_url)?,
    };
    debug!(count = targets.len(), page_url, ?strategy, "resolved targets");
    Ok(targets)
}

fn by_position(rows: &[Row], page_url: &str) -> Result<Vec<DownloadTarget>, CatalogError> {
    PACKAGE_ROWS
        .iter()
        .map(|&index| {
            let row = rows
                .get(index)
                .ok_or_else(|| CatalogError::missing_row(page_url, index))?;
            let cell = row
                .cell(1)
                .ok_or_else(|| CatalogError::missing_cell(page_url, index, 1))?;
            let href = cell
                .link
                .as_deref()
                .ok_or_else(|| CatalogError::missing_link(page_url, index))?;
            plain_target(page_url, index, href)
        })
        .collect()
}

fn by_role(rows: &[Row], page_url: &str) -> Result<Vec<DownloadTarget>, CatalogError> {
    let mut found: Vec<(PackageRole, usize, &str)> =
        Vec::with_capacity(PackageRole::all().len());

    for (index, href) in rows.iter().enumerate().filter_map(|(index, row)| {
        row.cell(1)
            .and_then(|cell| cell.link.as_deref())
            .map(|href| (index, href))
    }) {
        let Some(role) = PackageRole::classify(href) else {
            continue;
        };
        if !found.iter().any(|(seen, _, _)| *seen == role) {
            found.push((role, index, href));
        }
    }

    if let Some(&role) = PackageRole::all()
        .iter()
        .find(|role| !found.iter().any(|(seen, _, _)| seen == *role))
    {
        return Err(CatalogError::MissingPackageRole {
            page: page_url.to_string(),
            role,
        });
    }

    found
        .into_iter()
        .map(|(_, index, href)| plain_target(page_url, index, href))
        .collect()
}

/// Links must name a file directly inside `page_url`
fn plain_target(page_url: &str, row: usize, href: &str) -> Result<DownloadTarget, CatalogError> {
    if !is_plain_file_name(href) {
        return Err(CatalogError::UnsafeFileName {
            page: page_url.to_string(),
            row,
            name: href.to_string(),
        });
    }
    Ok(DownloadTarget::new(page_url, href))
}
