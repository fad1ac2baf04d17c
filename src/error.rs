//! Application error types using thiserror
//!
//! Error hierarchy:
//! - CatalogError: The upstream listing no longer has the expected shape
//! - SelectionError: Operator input could not be turned into an index
//! - TransferError: Page fetches and artifact downloads
//! - HostError: Running kernel could not be identified
//! - InstallError: The privileged package install failed
//! - ConfigError: Issues with CLI or config file values
//! - IoError: File system operation failures

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::PackageRole;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Upstream markup related errors
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Operator input related errors
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// Network and download related errors
    #[error(transparent)]
    Transfer(#[from] TransferError),

    /// Host kernel detection errors
    #[error(transparent)]
    Host(#[from] HostError),

    /// Package installation errors
    #[error(transparent)]
    Install(#[from] InstallError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO related errors
    #[error(transparent)]
    Io(#[from] IoError),
}

/// Errors raised when an upstream page does not have the expected structure
#[derive(Error, Debug)]
pub enum CatalogError {
    /// No <table> element in the page
    #[error("no table found in {page}; the upstream format may have changed")]
    TableNotFound { page: String },

    /// Expected row is missing
    #[error("row {row} not found in {page}")]
    MissingRow { page: String, row: usize },

    /// Row exists but lacks an expected cell
    #[error("row {row} in {page} has no cell {cell}")]
    MissingCell {
        page: String,
        row: usize,
        cell: usize,
    },

    /// Cell exists but holds no link
    #[error("row {row} in {page} has no package link")]
    MissingLink { page: String, row: usize },

    /// Content-based matching found no file for a role
    #[error("no {role} package listed in {page}")]
    MissingPackageRole { page: String, role: PackageRole },

    /// A package link is not a plain file name
    #[error("row {row} in {page} links to '{name}', which is not a plain file name")]
    UnsafeFileName {
        page: String,
        row: usize,
        name: String,
    },

    /// The catalog produced no usable versions
    #[error("no kernel versions found in {page}")]
    NoVersions { page: String },
}

/// Errors related to the operator's version choice
#[derive(Error, Debug)]
pub enum SelectionError {
    /// Nothing was entered
    #[error("no index entered")]
    Empty,

    /// Input is not an integer
    #[error("'{input}' is not a valid index")]
    NotANumber { input: String },

    /// Index outside the listed entries
    #[error("index {index} is out of range (expected 0..={max})")]
    OutOfRange { index: i64, max: usize },

    /// Prompting or reading the answer failed
    #[error("failed to read selection: {0}")]
    Prompt(#[source] std::io::Error),
}

/// Errors related to fetching pages and downloading artifacts
#[derive(Error, Debug)]
pub enum TransferError {
    /// Request could not be completed
    #[error("failed to fetch {url}: {message}")]
    Request { url: String, message: String },

    /// Server answered with an error status
    #[error("failed to fetch {url}: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// Request exceeded the configured timeout
    #[error("timeout while fetching {url}")]
    Timeout { url: String },

    /// Download process could not be started
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Download process exited unsuccessfully
    #[error("error while downloading \"{url}\" (exit status {})", display_code(.code))]
    ProcessFailed { url: String, code: Option<i32> },

    /// Destination name would leave the version directory
    #[error("refusing to download \"{url}\": '{file_name}' is not a plain file name")]
    UnsafeFileName { url: String, file_name: String },

    /// Download finished but produced nothing
    #[error("error while downloading \"{url}\": {path} is empty")]
    EmptyFile { url: String, path: PathBuf },
}

/// Errors related to detecting the running kernel
#[derive(Error, Debug)]
pub enum HostError {
    /// uname could not be run
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Output did not contain a kernel release
    #[error("no kernel version found in '{output}'")]
    PatternNotFound { output: String },
}

/// Errors related to the privileged install step
#[derive(Error, Debug)]
pub enum InstallError {
    /// Installer process could not be started
    #[error("failed to start {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Installer ran but reported failure
    #[error("{command} failed (exit status {})", display_code(.code))]
    Failed { command: String, code: Option<i32> },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for our schema
    #[error("failed to parse TOML in {path}: {message}")]
    TomlParseError { path: PathBuf, message: String },

    /// A value is outside its allowed range
    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Conflicting options
    #[error("conflicting options: {message}")]
    ConflictingOptions { message: String },

    /// HTTP client could not be built
    #[error("failed to create HTTP client: {message}")]
    HttpClient { message: String },

    /// Ctrl+C handler could not be installed
    #[error("failed to set signal handler: {message}")]
    SignalHandler { message: String },

    /// Staging root exists but was not created by kernup
    #[error("staging root {path} already exists and is not a kernup staging area; refusing to use it")]
    UnownedStagingRoot { path: PathBuf },
}

/// Errors related to IO operations
#[derive(Error, Debug)]
pub enum IoError {
    /// Directory could not be created
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error at {path}: {source}")]
    Generic {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    }
}

impl CatalogError {
    /// Creates a new TableNotFound error
    pub fn table_not_found(page: impl Into<String>) -> Self {
        CatalogError::TableNotFound { page: page.into() }
    }

    /// Creates a new MissingRow error
    pub fn missing_row(page: impl Into<String>, row: usize) -> Self {
        CatalogError::MissingRow {
            page: page.into(),
            row,
        }
    }

    /// Creates a new MissingCell error
    pub fn missing_cell(page: impl Into<String>, row: usize, cell: usize) -> Self {
        CatalogError::MissingCell {
            page: page.into(),
            row,
            cell,
        }
    }

    /// Creates a new MissingLink error
    pub fn missing_link(page: impl Into<String>, row: usize) -> Self {
        CatalogError::MissingLink {
            page: page.into(),
            row,
        }
    }
}

impl TransferError {
    /// Creates a new Request error
    pub fn request(url: impl Into<String>, message: impl Into<String>) -> Self {
        TransferError::Request {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a new ProcessFailed error
    pub fn process_failed(url: impl Into<String>, code: Option<i32>) -> Self {
        TransferError::ProcessFailed {
            url: url.into(),
            code,
        }
    }

    /// Creates a new EmptyFile error
    pub fn empty_file(url: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        TransferError::EmptyFile {
            url: url.into(),
            path: path.into(),
        }
    }
}

impl IoError {
    /// Creates a new CreateDir error
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IoError::CreateDir {
            path: path.into(),
            source,
        }
    }

    /// Creates a new Generic IO error
    pub fn generic(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IoError::Generic {
            path: path.into(),
            source,
        }
    }
}
