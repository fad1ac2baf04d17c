//! Staged downloader
//!
//! Downloads a version's targets one after another into
//! `<staging-root>/<version>/`. The first failure aborts the batch; files
//! already written stay until the staging guard removes the root.

use crate::domain::DownloadTarget;
use crate::error::{AppError, IoError, TransferError};
use crate::staging::StagingArea;
use async_trait::async_trait;
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

/// Retrieves one URL into an already opened file
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Write the body of `url` into `destination`
    async fn fetch(&self, url: &str, destination: File) -> Result<(), TransferError>;
}

/// Fetcher running `curl --fail` with stdout redirected into the file
#[derive(Debug, Default, Clone)]
pub struct CurlFetcher {
    timeout: Option<Duration>,
}

impl CurlFetcher {
    const PROGRAM: &'static str = "curl";

    /// Create a fetcher without a time limit
    pub fn new() -> Self {
        Self { timeout: None }
    }

    /// Create a fetcher passing `--max-time` to curl
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    /// Arguments for one transfer. `--fail` keeps HTTP error bodies out of
    /// the destination file.
    fn args(&self, url: &str) -> Vec<String> {
        let mut args = vec![
            "--fail".to_string(),
            "--silent".to_string(),
            "--show-error".to_string(),
        ];
        if let Some(timeout) = self.timeout {
            args.push("--max-time".to_string());
            args.push(timeout.as_secs().max(1).to_string());
        }
        args.push(url.to_string());
        args
    }
}

#[async_trait]
impl Fetcher for CurlFetcher {
    async fn fetch(&self, url: &str, destination: File) -> Result<(), TransferError> {
        let output = Command::new(Self::PROGRAM)
            .args(self.args(url))
            .stdin(Stdio::null())
            .stdout(Stdio::from(destination))
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| TransferError::Spawn {
                program: Self::PROGRAM.to_string(),
                source,
            })?;

        if !output.status.success() {
            debug!(
                url,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "curl failed"
            );
            return Err(TransferError::process_failed(url, output.status.code()));
        }
        Ok(())
    }
}

/// Sequential downloader into the staging area
pub struct StagedDownloader {
    fetcher: Box<dyn Fetcher>,
    staging: StagingArea,
}

impl StagedDownloader {
    /// Create a downloader writing below `staging`
    pub fn new(fetcher: Box<dyn Fetcher>, staging: StagingArea) -> Self {
        Self { fetcher, staging }
    }

    /// The staging layout in use
    pub fn staging(&self) -> &StagingArea {
        &self.staging
    }

    /// Download every target in order and return the version directory.
    ///
    /// `on_start` is called before each transfer with its position.
    pub async fn download_all<F>(
        &self,
        version: &str,
        targets: &[DownloadTarget],
        mut on_start: F,
    ) -> Result<PathBuf, AppError>
    where
        F: FnMut(usize, &DownloadTarget),
    {
        let version_dir = self.staging.version_dir(version);

        for (position, target) in targets.iter().enumerate() {
            on_start(position, target);
            let path = self.staging.file_path(version, &target.file_name);
            self.download_one(target, &path).await?;
        }

        info!(version, dir = %version_dir.display(), count = targets.len(), "downloads complete");
        Ok(version_dir)
    }

    async fn download_one(&self, target: &DownloadTarget, path: &Path) -> Result<(), AppError> {
        if !target.has_plain_file_name() {
            return Err(TransferError::UnsafeFileName {
                url: target.url.clone(),
                file_name: target.file_name.clone(),
            }
            .into());
        }
        if let Some(parent) = path.parent() {
            create_missing_dirs(parent)?;
        }
        let file = File::create(path).map_err(|e| IoError::generic(path, e))?;

        debug!(url = %target.url, path = %path.display(), "downloading");
        self.fetcher.fetch(&target.url, file).await?;

        let size = fs::metadata(path)
            .map_err(|e| IoError::generic(path, e))?
            .len();
        if size == 0 {
            return Err(TransferError::empty_file(&target.url, path).into());
        }
        debug!(path = %path.display(), size, "downloaded");
        Ok(())
    }
}

/// Create each missing component of `dir`, outermost first
pub fn create_missing_dirs(dir: &Path) -> Result<(), IoError> {
    let mut ancestors: Vec<&Path> = dir
        .ancestors()
        .filter(|p| !p.as_os_str().is_empty())
        .collect();
    ancestors.reverse();

    for ancestor in ancestors {
        match fs::create_dir(ancestor) {
            Ok(()) => debug!(dir = %ancestor.display(), "created"),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(e) => return Err(IoError::create_dir(ancestor, e)),
        }
    }
    Ok(())
}
