//! Runtime settings
//!
//! Values come from, in order of precedence: CLI flags, the optional TOML
//! file given with `--config`, built-in defaults.
//!
//! Boolean switches (`match_by_role`, `ignore_install_status`) can only be
//! turned on from the CLI. A `true` in the file stays on for every run that
//! uses that file; there is no flag to switch it back off.
//!
//! ```toml
//! index_url = "https://kernel.ubuntu.com/mainline"
//! staging_root = "/var/tmp/kernel-updater"
//! max_versions = 10
//! timeout_secs = 120
//! match_by_role = false
//! ignore_install_status = false
//! ```

use crate::catalog::{MatchStrategy, DEFAULT_MAX_VERSIONS};
use crate::cli::CliArgs;
use crate::error::ConfigError;
use crate::index::DEFAULT_INDEX_URL;
use crate::staging::DEFAULT_STAGING_ROOT;
use serde::Deserialize;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

/// Contents of a config file; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub index_url: Option<String>,
    pub staging_root: Option<PathBuf>,
    pub max_versions: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub match_by_role: Option<bool>,
    pub ignore_install_status: Option<bool>,
}

impl FileConfig {
    /// Read and parse a config file
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse config file contents; `path` only labels errors
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::TomlParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Effective settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Base URL of the mainline index
    pub index_url: String,
    /// Staging root, removed on exit
    pub staging_root: PathBuf,
    /// Versions offered for selection
    pub max_versions: usize,
    /// Per-request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
    /// How package files are picked from a detail page
    pub strategy: MatchStrategy,
    /// Treat a failed install as success
    pub ignore_install_status: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            index_url: DEFAULT_INDEX_URL.to_string(),
            staging_root: PathBuf::from(DEFAULT_STAGING_ROOT),
            max_versions: DEFAULT_MAX_VERSIONS,
            timeout: None,
            strategy: MatchStrategy::default(),
            ignore_install_status: false,
        }
    }
}

impl Settings {
    /// Build settings from CLI arguments, loading `--config` if given
    pub fn from_cli(args: &CliArgs) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => FileConfig::from_path(path)?,
            None => FileConfig::default(),
        };
        Self::merge(args, file)
    }

    /// Layer CLI arguments over file values over defaults
    pub fn merge(args: &CliArgs, file: FileConfig) -> Result<Self, ConfigError> {
        if args.json && !args.list && !args.dry_run {
            return Err(ConfigError::ConflictingOptions {
                message: "--json requires --list or --dry-run".to_string(),
            });
        }

        if args.json && args.dry_run && args.pick.is_none() {
            return Err(ConfigError::ConflictingOptions {
                message: "--json with --dry-run requires --pick".to_string(),
            });
        }

        let defaults = Self::default();

        let max_versions = args
            .max_versions
            .or(file.max_versions)
            .unwrap_or(defaults.max_versions);
        if max_versions == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_versions".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        let timeout = match (args.timeout, file.timeout_secs) {
            (Some(timeout), _) => Some(timeout),
            (None, Some(0)) => {
                return Err(ConfigError::InvalidValue {
                    key: "timeout_secs".to_string(),
                    message: "must be greater than zero".to_string(),
                })
            }
            (None, Some(secs)) => Some(Duration::from_secs(secs)),
            (None, None) => defaults.timeout,
        };

        let index_url = args
            .index_url
            .clone()
            .or(file.index_url)
            .unwrap_or(defaults.index_url);
        if !(index_url.starts_with("http://") || index_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                key: "index_url".to_string(),
                message: format!("'{}' is not an http(s) URL", index_url),
            });
        }

        let staging_root = args
            .staging_root
            .clone()
            .or(file.staging_root)
            .unwrap_or(defaults.staging_root);
        validate_staging_root(&staging_root)?;

        let match_by_role = args.match_by_role || file.match_by_role.unwrap_or(false);

        Ok(Self {
            index_url,
            staging_root,
            max_versions,
            timeout,
            strategy: if match_by_role {
                MatchStrategy::ByRole
            } else {
                MatchStrategy::Positional
            },
            ignore_install_status: args.ignore_install_status
                || file.ignore_install_status.unwrap_or(false),
        })
    }
}

/// The root must be an absolute, already-normalized path at least two levels
/// below `/`. Ownership of an existing directory is checked by `StagingGuard`.
fn validate_staging_root(root: &Path) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        key: "staging_root".to_string(),
        message: format!("'{}' {}", root.display(), reason),
    };

    // `components()` drops inner `.` segments, so check the raw text too
    let has_dot_segment = root
        .to_string_lossy()
        .split('/')
        .any(|segment| segment == "." || segment == "..");
    if has_dot_segment
        || root
            .components()
            .any(|c| matches!(c, Component::CurDir | Component::ParentDir))
    {
        return Err(invalid("must not contain '.' or '..' segments"));
    }

    let depth = root
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .count();
    if !root.is_absolute() || depth < 2 {
        return Err(invalid("must be an absolute path at least two levels deep"));
    }
    Ok(())
}
