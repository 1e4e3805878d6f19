//! Archive container abstraction.
//!
//! A package archive is a zip container holding content parts plus
//! container-internal bookkeeping: relationship descriptors under reserved
//! top-level directories and a root-level manifest carrying the package
//! identity. Only content parts may be written into the install tree.

use crate::core::identity::{PackageIdentity, Version};
use crate::core::layout::MANIFEST_EXT;
use crate::error::{NupakError, Result};
use percent_encoding::percent_decode_str;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Reserved top-level directories holding container bookkeeping, never
/// extracted. Compared case-insensitively.
const EXCLUDED_DIRS: [&str; 2] = ["_rels", "package"];

/// One entry inside an open archive. `raw_name` is the container-internal
/// locator: '/'-separated and URI-escaped.
#[derive(Debug, Clone)]
pub struct ArchivePart {
    pub raw_name: String,
    pub size: u64,
    pub entry_index: usize,
}

/// Capability interface over a package container, so another container format
/// can stand in for the zip-backed one.
pub trait PackageArchive {
    /// Identity read from the embedded manifest.
    fn identity(&self) -> &PackageIdentity;

    /// All non-directory entries, content and metadata alike.
    fn parts(&self) -> &[ArchivePart];

    /// Byte stream for one part.
    fn open_part(&mut self, part: &ArchivePart) -> Result<Box<dyn Read + '_>>;
}

/// Returns true when a part is genuine installable content rather than
/// container metadata: parts under a reserved directory and the auto-generated
/// root-level manifest (`{name}.pakspec`, or `{name}.{version}.pakspec`) are
/// excluded.
pub fn is_content_part(raw_name: &str, package_name: &str) -> bool {
    let path = raw_name.strip_prefix('/').unwrap_or(raw_name);

    match path.split_once('/') {
        Some((top_dir, _)) => !EXCLUDED_DIRS
            .iter()
            .any(|excluded| top_dir.eq_ignore_ascii_case(excluded)),
        None => !is_manifest_name(path, package_name),
    }
}

fn is_manifest_name(file_name: &str, package_name: &str) -> bool {
    let file_name = file_name.to_ascii_lowercase();
    let name = package_name.to_ascii_lowercase();

    let Some(stem) = file_name.strip_suffix(&format!(".{MANIFEST_EXT}")) else {
        return false;
    };

    stem == name || stem.starts_with(&format!("{name}."))
}

/// Re-express a raw part locator as a host-relative path: percent-decoded,
/// leading slash dropped, '/'-separated components joined with the host
/// separator. Returns None for locators that would escape the install
/// directory.
pub fn part_relative_path(raw_name: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(raw_name).decode_utf8_lossy();
    let trimmed = decoded.strip_prefix('/').unwrap_or(&decoded);

    let mut path = PathBuf::new();
    for component in trimmed.split('/') {
        match component {
            "" | "." => continue,
            ".." => return None,
            _ => path.push(component),
        }
    }

    if path.as_os_str().is_empty() {
        None
    } else {
        Some(path)
    }
}

#[derive(Deserialize)]
struct Manifest {
    name: String,
    version: Version,
}

/// Zip-backed package container.
#[derive(Debug)]
pub struct ZipPackage {
    path: PathBuf,
    archive: ZipArchive<File>,
    identity: PackageIdentity,
    parts: Vec<ArchivePart>,
}

impl ZipPackage {
    /// Open the archive at `path` and read its embedded manifest. A missing
    /// file reports `ArchiveNotFound`; anything unreadable as a package
    /// container reports `CorruptArchive`.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(NupakError::ArchiveNotFound {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path)?;
        let mut archive = ZipArchive::new(file)
            .map_err(|e| NupakError::corrupt_archive(path, e.to_string()))?;

        let mut parts = Vec::new();
        for index in 0..archive.len() {
            let entry = archive
                .by_index(index)
                .map_err(|e| NupakError::corrupt_archive(path, e.to_string()))?;
            if entry.is_dir() {
                continue;
            }
            parts.push(ArchivePart {
                raw_name: entry.name().to_string(),
                size: entry.size(),
                entry_index: index,
            });
        }

        let identity = read_manifest(path, &mut archive, &parts)?;

        Ok(ZipPackage {
            path: path.to_path_buf(),
            archive,
            identity,
            parts,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PackageArchive for ZipPackage {
    fn identity(&self) -> &PackageIdentity {
        &self.identity
    }

    fn parts(&self) -> &[ArchivePart] {
        &self.parts
    }

    fn open_part(&mut self, part: &ArchivePart) -> Result<Box<dyn Read + '_>> {
        let entry = self
            .archive
            .by_index(part.entry_index)
            .map_err(|e| NupakError::corrupt_archive(&self.path, e.to_string()))?;
        Ok(Box::new(entry))
    }
}

fn read_manifest(
    path: &Path,
    archive: &mut ZipArchive<File>,
    parts: &[ArchivePart],
) -> Result<PackageIdentity> {
    let manifest_part = parts
        .iter()
        .find(|part| {
            let name = part.raw_name.strip_prefix('/').unwrap_or(&part.raw_name);
            !name.contains('/')
                && Path::new(name)
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(MANIFEST_EXT))
        })
        .ok_or_else(|| NupakError::corrupt_archive(path, "no package manifest found"))?;

    let entry = archive
        .by_index(manifest_part.entry_index)
        .map_err(|e| NupakError::corrupt_archive(path, e.to_string()))?;

    let manifest: Manifest = serde_json::from_reader(entry)
        .map_err(|e| NupakError::corrupt_archive(path, format!("unreadable manifest: {e}")))?;

    PackageIdentity::new(manifest.name, manifest.version)
}
