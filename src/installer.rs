//! Privileged installation of the staged packages
//!
//! This module provides:
//! - The `InstallRunner` seam used by the orchestrator
//! - `SudoDpkg`, which runs `sudo dpkg --install --recursive <dir>/` with
//!   the terminal's stdin, stdout and stderr so password prompts work

use crate::error::InstallError;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Result of a package installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallResult {
    /// The command that was executed
    pub command: String,
    /// Whether the command succeeded
    pub success: bool,
    /// Exit code, if the process was not killed by a signal
    pub code: Option<i32>,
}

impl InstallResult {
    /// Create a successful install result
    pub fn success(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            success: true,
            code: Some(0),
        }
    }

    /// Create a failed install result
    pub fn failure(command: impl Into<String>, code: Option<i32>) -> Self {
        Self {
            command: command.into(),
            success: false,
            code,
        }
    }

    /// Turn an unsuccessful run into an error
    pub fn into_result(self) -> Result<Self, InstallError> {
        if self.success {
            Ok(self)
        } else {
            Err(InstallError::Failed {
                command: self.command,
                code: self.code,
            })
        }
    }
}

/// Trait for running the package install
#[async_trait]
pub trait InstallRunner: Send + Sync {
    /// Install every package found below `dir`
    async fn install(&self, dir: &Path) -> Result<InstallResult, InstallError>;
}

/// Installer elevating `dpkg` through `sudo`
#[derive(Debug, Default)]
pub struct SudoDpkg;

impl SudoDpkg {
    /// Create a new installer
    pub fn new() -> Self {
        Self
    }

    /// Full command line. The trailing slash makes dpkg treat the path as a
    /// directory of packages.
    fn command(&self, dir: &Path) -> Vec<String> {
        let dir = dir.display().to_string();
        vec![
            "sudo".to_string(),
            "dpkg".to_string(),
            "--install".to_string(),
            "--recursive".to_string(),
            format!("{}/", dir.trim_end_matches('/')),
        ]
    }
}

#[async_trait]
impl InstallRunner for SudoDpkg {
    async fn install(&self, dir: &Path) -> Result<InstallResult, InstallError> {
        let command = self.command(dir);
        let command_str = command.join(" ");
        debug!(command = %command_str, "running installer");

        let status = Command::new(&command[0])
            .args(&command[1..])
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|source| InstallError::Spawn {
                command: command_str.clone(),
                source,
            })?;

        if status.success() {
            Ok(InstallResult::success(command_str))
        } else {
            Ok(InstallResult::failure(command_str, status.code()))
        }
    }
}
