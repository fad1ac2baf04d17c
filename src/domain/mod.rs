//! Core domain models for kernup
//!
//! This module contains the fundamental types used throughout the application:
//! - Catalog entries for published mainline builds
//! - Download targets resolved from a version's detail page
//! - Package roles making up one installable kernel set
//! - The running host kernel release

mod download_target;
mod host_kernel;
mod package_role;
mod version_entry;

pub use download_target::{is_plain_file_name, DownloadTarget};
pub use host_kernel::HostKernelVersion;
pub use package_role::{PackageRole, TARGET_ARCH};
pub use version_entry::{VersionEntry, LAST_MODIFIED_FORMAT};
