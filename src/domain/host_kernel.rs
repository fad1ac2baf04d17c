//! Running kernel release of the host

use std::fmt;

/// Kernel release string reported by the host (e.g., "6.8.0-31-generic")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostKernelVersion(String);

impl HostKernelVersion {
    /// Wrap an extracted release string
    pub fn new(release: impl Into<String>) -> Self {
        Self(release.into())
    }

    /// The release string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HostKernelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
