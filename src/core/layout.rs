//! Path resolution for the on-disk repository layout.
//!
//! Every package installs under `root/{name}.{version}/`, which holds a copy
//! of the original archive named `{name}.{version}.pak` plus the extracted
//! content tree. These are pure functions; identity validation happens when
//! the `PackageIdentity` is constructed.

use crate::core::identity::PackageIdentity;
use std::path::{Path, PathBuf};

/// Extension of the archive copy persisted inside the install directory.
pub const ARCHIVE_EXT: &str = "pak";

/// Extension of the manifest embedded at the root of an archive.
pub const MANIFEST_EXT: &str = "pakspec";

pub fn package_dir_name(identity: &PackageIdentity) -> String {
    identity.full_name()
}

pub fn package_dir(root: &Path, identity: &PackageIdentity) -> PathBuf {
    root.join(package_dir_name(identity))
}

pub fn archive_file_name(identity: &PackageIdentity) -> String {
    format!("{}.{ARCHIVE_EXT}", identity.full_name())
}

pub fn archive_path(root: &Path, identity: &PackageIdentity) -> PathBuf {
    package_dir(root, identity).join(archive_file_name(identity))
}
