//! Staging area for downloaded packages
//!
//! Layout is `<root>/<version>/<file>`. The root is private to kernup: it is
//! created with an ownership marker and removed by `StagingGuard` on every
//! way out of the process, Ctrl+C included. Directories kernup did not
//! create are never claimed or removed.

use crate::error::{AppError, ConfigError, IoError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Default staging root
pub const DEFAULT_STAGING_ROOT: &str = "/var/tmp/kernel-updater";

/// Exit code used when the run is interrupted
pub const INTERRUPT_EXIT_CODE: i32 = 1;

/// Path layout of the staging area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    /// Create a layout rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The staging root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding every file of one version
    pub fn version_dir(&self, version: &str) -> PathBuf {
        self.root.join(version)
    }

    /// Destination of one downloaded file
    pub fn file_path(&self, version: &str, file_name: &str) -> PathBuf {
        self.version_dir(version).join(file_name)
    }
}

impl Default for StagingArea {
    fn default() -> Self {
        Self::new(DEFAULT_STAGING_ROOT)
    }
}

/// File marking a staging root as created by kernup
pub const OWNER_MARKER: &str = ".kernup-staging";

/// Removes the staging root once, whichever exit path runs first.
///
/// Only a root carrying `OWNER_MARKER` is ever removed.
pub struct StagingGuard {
    root: PathBuf,
    released: Arc<AtomicBool>,
}

impl StagingGuard {
    /// Claim `root` for this run.
    ///
    /// A missing root is created together with the marker. An existing root
    /// is reused only if it carries the marker; anything else is refused.
    pub fn acquire(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let root = root.into();
        let marker = root.join(OWNER_MARKER);

        match fs::symlink_metadata(&root) {
            Ok(meta) if meta.is_dir() && marker.is_file() => {
                debug!(root = %root.display(), "reusing staging area");
            }
            Ok(_) => return Err(ConfigError::UnownedStagingRoot { path: root }.into()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fs::create_dir_all(&root).map_err(|e| IoError::create_dir(&root, e))?;
                fs::write(&marker, b"").map_err(|e| IoError::generic(&marker, e))?;
                debug!(root = %root.display(), "staging area created");
            }
            Err(e) => return Err(IoError::generic(&root, e).into()),
        }

        Ok(Self {
            root,
            released: Arc::new(AtomicBool::new(false)),
        })
    }

    /// The guarded root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Also release on Ctrl+C, then exit with `INTERRUPT_EXIT_CODE`.
    ///
    /// Can only be installed once per process.
    pub fn release_on_interrupt(&self) -> Result<(), ConfigError> {
        let root = self.root.clone();
        let released = Arc::clone(&self.released);

        ctrlc::set_handler(move || {
            release_root(&root, &released);
            eprintln!();
            std::process::exit(INTERRUPT_EXIT_CODE);
        })
        .map_err(|e| ConfigError::SignalHandler {
            message: e.to_string(),
        })
    }

    /// Remove the staging root now. Returns false if it was already released.
    pub fn release(&self) -> bool {
        release_root(&self.root, &self.released)
    }

    /// Whether the root has been released
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }
}

impl Drop for StagingGuard {
    fn drop(&mut self) {
        self.release();
    }
}

fn release_root(root: &Path, released: &AtomicBool) -> bool {
    if released.swap(true, Ordering::SeqCst) {
        return false;
    }
    if !root.join(OWNER_MARKER).is_file() {
        warn!(root = %root.display(), "staging marker missing, leaving directory in place");
        return true;
    }
    match fs::remove_dir_all(root) {
        Ok(()) => debug!(root = %root.display(), "staging area removed"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(root = %root.display(), error = %e, "failed to remove staging area"),
    }
    true
}
