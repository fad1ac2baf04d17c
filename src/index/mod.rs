//! Access to the upstream mainline build index
//!
//! This module provides:
//! - The `PageSource` seam for fetching listing pages
//! - The HTTP-backed page source
//! - `MainlineIndex`, which joins URLs, fetching and parsing

mod client;

pub use client::HttpClient;

use crate::catalog::{parse_catalog, resolve_targets, MatchStrategy};
use crate::domain::{DownloadTarget, VersionEntry, TARGET_ARCH};
use crate::error::{AppError, CatalogError, TransferError};
use async_trait::async_trait;
use tracing::info;

/// Default location of the mainline build index
pub const DEFAULT_INDEX_URL: &str = "https://kernel.ubuntu.com/mainline";

/// Query asking the index for names in descending order
const CATALOG_QUERY: &str = "?C=N;O=D";

/// Something that can return the markup behind a URL
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the body of `url` as text
    async fn fetch_text(&self, url: &str) -> Result<String, TransferError>;
}

/// Catalog and detail lookups against one index location
pub struct MainlineIndex {
    source: Box<dyn PageSource>,
    base_url: String,
    max_versions: usize,
    strategy: MatchStrategy,
}

impl MainlineIndex {
    /// Create an index reader
    pub fn new(
        source: Box<dyn PageSource>,
        base_url: impl Into<String>,
        max_versions: usize,
        strategy: MatchStrategy,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            source,
            base_url,
            max_versions,
            strategy,
        }
    }

    /// URL of the top-level listing, newest first
    pub fn catalog_url(&self) -> String {
        format!("{}/{}", self.base_url, CATALOG_QUERY)
    }

    /// URL of a version's architecture directory
    pub fn detail_url(&self, version: &str) -> String {
        format!("{}/v{}/{}/", self.base_url, version, TARGET_ARCH)
    }

    /// Fetch and parse the catalog
    pub async fn fetch_catalog(&self) -> Result<Vec<VersionEntry>, AppError> {
        let url = self.catalog_url();
        let markup = self.source.fetch_text(&url).await?;
        let entries = parse_catalog(&markup, &url, self.max_versions)?;
        if entries.is_empty() {
            return Err(CatalogError::NoVersions { page: url }.into());
        }
        info!(count = entries.len(), "catalog loaded");
        Ok(entries)
    }

    /// Fetch a version's detail page and resolve its package files
    pub async fn fetch_targets(&self, entry: &VersionEntry) -> Result<Vec<DownloadTarget>, AppError> {
        let url = self.detail_url(&entry.version);
        let markup = self.source.fetch_text(&url).await?;
        let targets = resolve_targets(&markup, &url, self.strategy)?;
        info!(version = %entry.version, count = targets.len(), "targets resolved");
        Ok(targets)
    }
}
