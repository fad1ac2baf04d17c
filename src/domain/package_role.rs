//! Roles of the packages that make up one mainline kernel set

use serde::{Deserialize, Serialize};
use std::fmt;

/// Architecture every package is resolved for
pub const TARGET_ARCH: &str = "amd64";

/// Kind of package within a kernel set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackageRole {
    /// linux-image-unsigned-*-generic_*_amd64.deb
    Image,
    /// linux-headers-*_all.deb
    HeadersCommon,
    /// linux-headers-*-generic_*_amd64.deb
    HeadersArch,
    /// linux-modules-*-generic_*_amd64.deb
    Modules,
}

impl PackageRole {
    /// Classify a package file name, if it belongs to the generic amd64 set
    pub fn classify(file_name: &str) -> Option<Self> {
        let arch_suffix = format!("_{}.deb", TARGET_ARCH);
        let generic = file_name.contains("-generic");

        if file_name.starts_with("linux-headers-") {
            if file_name.ends_with("_all.deb") {
                return Some(PackageRole::HeadersCommon);
            }
            if generic && file_name.ends_with(&arch_suffix) {
                return Some(PackageRole::HeadersArch);
            }
            return None;
        }
        if !generic || !file_name.ends_with(&arch_suffix) {
            return None;
        }
        if file_name.starts_with("linux-image-") {
            Some(PackageRole::Image)
        } else if file_name.starts_with("linux-modules-") {
            Some(PackageRole::Modules)
        } else {
            None
        }
    }

    /// Returns the display name for this role
    pub fn display_name(&self) -> &'static str {
        match self {
            PackageRole::Image => "image",
            PackageRole::HeadersCommon => "common headers",
            PackageRole::HeadersArch => "arch headers",
            PackageRole::Modules => "modules",
        }
    }

    /// Returns all roles a complete set must contain
    pub fn all() -> &'static [PackageRole] {
        &[
            PackageRole::HeadersArch,
            PackageRole::HeadersCommon,
            PackageRole::Image,
            PackageRole::Modules,
        ]
    }
}

impl fmt::Display for PackageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
