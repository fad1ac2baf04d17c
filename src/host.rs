//! Detection of the kernel release the host is running
//!
//! Runs `uname -a` once and extracts the first `X.Y.Z-N-flavour` release.

use crate::domain::HostKernelVersion;
use crate::error::HostError;
use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use tokio::process::Command;
use tracing::debug;

static KERNEL_RELEASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+\.\d+-\d+-[a-z]+").unwrap());

/// Source of the host's running kernel release
#[async_trait]
pub trait HostProbe: Send + Sync {
    /// Identify the running kernel
    async fn kernel_version(&self) -> Result<HostKernelVersion, HostError>;
}

/// Probe backed by `uname -a`
#[derive(Debug, Default)]
pub struct UnameProbe;

impl UnameProbe {
    const PROGRAM: &'static str = "uname";
    const ARGS: [&'static str; 1] = ["-a"];

    /// Create a new uname probe
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HostProbe for UnameProbe {
    async fn kernel_version(&self) -> Result<HostKernelVersion, HostError> {
        let output = Command::new(Self::PROGRAM)
            .args(Self::ARGS)
            .output()
            .await
            .map_err(|source| HostError::Spawn {
                program: Self::PROGRAM.to_string(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!(output = %stdout.trim(), "uname");
        extract_kernel_version(&stdout)
    }
}

/// Extract the kernel release from `uname -a` output
pub fn extract_kernel_version(output: &str) -> Result<HostKernelVersion, HostError> {
    KERNEL_RELEASE_RE
        .find(output)
        .map(|m| HostKernelVersion::new(m.as_str()))
        .ok_or_else(|| HostError::PatternNotFound {
            output: output.trim().to_string(),
        })
}
