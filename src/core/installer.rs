//! Install/uninstall orchestration.
//!
//! An install sequences three phases against the package's install directory:
//! delete any prior installation (Deleting), persist a copy of the archive
//! into the directory (Moving), then extract the filtered content parts from
//! that persisted copy (Installing). Reading the persisted copy means the
//! caller may delete the original download as soon as install returns.
//!
//! There is no partial-install detection and no rollback: an interrupted
//! install leaves the directory indeterminate, and the next install's delete
//! phase clears it.

use crate::core::archive::{
    is_content_part, part_relative_path, ArchivePart, PackageArchive, ZipPackage,
};
use crate::core::copier::write_with_progress;
use crate::core::delete::delete_dir_with_progress;
use crate::core::identity::PackageIdentity;
use crate::core::layout;
use crate::core::progress::{Operation, ProgressEvent, ProgressSink};
use crate::error::{NupakError, Result};
use crate::utils::fs;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A repository-style install root: one directory per package
/// identity+version, each holding the archive copy plus its extracted
/// content tree.
pub struct Repository {
    install_root: PathBuf,
    delete_pacing: Option<Duration>,
}

impl Repository {
    /// Open a repository rooted at `install_root`, creating the root if
    /// absent.
    pub fn new<P: Into<PathBuf>>(install_root: P) -> Result<Self> {
        let install_root = install_root.into();
        fs::ensure_dir_exists(&install_root)?;
        Ok(Repository {
            install_root,
            delete_pacing: None,
        })
    }

    /// Insert a delay between file deletions so delete progress stays
    /// visible to a human observer. Off by default.
    pub fn with_delete_pacing(mut self, pacing: Duration) -> Self {
        self.delete_pacing = Some(pacing);
        self
    }

    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    pub fn is_installed(&self, identity: &PackageIdentity) -> bool {
        layout::package_dir(&self.install_root, identity).exists()
    }

    /// Enumerate installed packages by parsing install directory names,
    /// sorted by name then version.
    pub fn installed_packages(&self) -> Result<Vec<PackageIdentity>> {
        let mut packages = Vec::new();

        for entry in std::fs::read_dir(&self.install_root)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            if let Some(dir_name) = entry.file_name().to_str() {
                if let Some(identity) = PackageIdentity::from_dir_name(dir_name) {
                    packages.push(identity);
                }
            }
        }

        packages.sort_by(|a, b| {
            a.name()
                .cmp(b.name())
                .then_with(|| a.version().cmp(b.version()))
        });

        Ok(packages)
    }

    /// Install the archive at `archive_file`, returning the identity read
    /// from its manifest. Any prior installation of the same identity is
    /// removed first.
    pub fn install(
        &self,
        archive_file: &Path,
        progress: &mut ProgressSink<'_>,
    ) -> Result<PackageIdentity> {
        let identity = ZipPackage::open(archive_file)?.identity().clone();
        let package_dir = layout::package_dir(&self.install_root, &identity);

        delete_dir_with_progress(&package_dir, self.delete_pacing, progress)?;

        let persisted_path = layout::archive_path(&self.install_root, &identity);
        let mut source = File::open(archive_file)?;
        let total_len = source.metadata()?.len();
        write_with_progress(
            &mut source,
            total_len,
            &persisted_path,
            Operation::Moving,
            progress,
        )?;

        // Extraction reads from the persisted copy, not the original
        // download location.
        let mut persisted = ZipPackage::open(&persisted_path)?;
        extract_content(&mut persisted, &persisted_path, &package_dir, progress)?;

        Ok(identity)
    }

    /// Remove an installed package. A missing install directory is a
    /// successful no-op with zero progress events.
    pub fn uninstall(
        &self,
        identity: &PackageIdentity,
        progress: &mut ProgressSink<'_>,
    ) -> Result<()> {
        let package_dir = layout::package_dir(&self.install_root, identity);
        delete_dir_with_progress(&package_dir, self.delete_pacing, progress)
    }
}

/// Extract every content part of `package` into `install_dir`, skipping
/// container metadata.
///
/// The stream copier reports percent-of-part; events are rescaled against the
/// total content byte count so the Installing phase stays non-decreasing
/// across parts and ends at 100 exactly once.
fn extract_content(
    package: &mut dyn PackageArchive,
    archive_path: &Path,
    install_dir: &Path,
    progress: &mut ProgressSink<'_>,
) -> Result<()> {
    let package_name = package.identity().name().to_string();
    let content_parts: Vec<ArchivePart> = package
        .parts()
        .iter()
        .filter(|part| is_content_part(&part.raw_name, &package_name))
        .cloned()
        .collect();

    let total_bytes: u64 = content_parts.iter().map(|part| part.size).sum();
    let mut completed_bytes: u64 = 0;

    for part in &content_parts {
        let relative = part_relative_path(&part.raw_name).ok_or_else(|| {
            NupakError::corrupt_archive(
                archive_path,
                format!("part escapes install directory: {}", part.raw_name),
            )
        })?;
        let dest = install_dir.join(relative);

        let part_size = part.size;
        let mut scaled = |event: ProgressEvent| {
            let percent = if total_bytes == 0 {
                event.percent
            } else {
                ((completed_bytes * 100 + u64::from(event.percent) * part_size) / total_bytes)
                    .min(100) as u8
            };
            progress(ProgressEvent::new(Operation::Installing, percent));
        };

        let mut reader = package.open_part(part)?;
        write_with_progress(&mut reader, part_size, &dest, Operation::Installing, &mut scaled)?;

        completed_bytes += part_size;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::{assert_eq, assert_ne};
    use std::collections::BTreeSet;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn write_sample_archive(path: &Path) {
        let file = File::create(path).unwrap();
        let mut writer = ZipWriter::new(file);
        let options = SimpleFileOptions::default();

        writer.start_file("_rels/.rels", options).unwrap();
        writer.write_all(b"<relationships/>").unwrap();

        writer
            .start_file("package/services/metadata/core.psmdcp", options)
            .unwrap();
        writer.write_all(b"<coreProperties/>").unwrap();

        writer.start_file("Sample.2.1.0.pakspec", options).unwrap();
        writer
            .write_all(br#"{"name":"Sample","version":"2.1.0"}"#)
            .unwrap();

        writer.start_file("bin/sample.exe", options).unwrap();
        writer.write_all(b"0123456789").unwrap();

        writer.finish().unwrap();
    }

    fn dir_entries(dir: &Path) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        if dir.exists() {
            for entry in std::fs::read_dir(dir).unwrap() {
                names.insert(entry.unwrap().file_name().to_string_lossy().into_owned());
            }
        }
        names
    }

    fn tree_files(dir: &Path) -> BTreeSet<PathBuf> {
        let mut files = BTreeSet::new();
        for file in fs::collect_files(dir).unwrap() {
            files.insert(file.strip_prefix(dir).unwrap().to_path_buf());
        }
        files
    }

    #[test]
    fn test_end_to_end_install() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("repo");
        let archive = temp.path().join("download.pak");
        write_sample_archive(&archive);

        let repo = Repository::new(&root).unwrap();
        let mut events = Vec::new();
        let identity = repo.install(&archive, &mut |e| events.push(e)).unwrap();

        assert_eq!(identity.full_name(), "Sample.2.1.0");
        assert!(repo.is_installed(&identity));

        let package_dir = root.join("Sample.2.1.0");
        assert_eq!(
            tree_files(&package_dir),
            BTreeSet::from([
                PathBuf::from("Sample.2.1.0.pak"),
                Path::new("bin").join("sample.exe"),
            ])
        );

        let extracted = std::fs::read(package_dir.join("bin/sample.exe")).unwrap();
        assert_eq!(extracted, b"0123456789");
    }

    #[test]
    fn test_install_progress_phases() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("download.pak");
        write_sample_archive(&archive);

        let repo = Repository::new(temp.path().join("repo")).unwrap();
        let mut events: Vec<ProgressEvent> = Vec::new();
        repo.install(&archive, &mut |e| events.push(e)).unwrap();

        // Fresh install: nothing to delete.
        assert!(!events.iter().any(|e| e.operation == Operation::Deleting));

        for operation in [Operation::Moving, Operation::Installing] {
            let phase: Vec<u8> = events
                .iter()
                .filter(|e| e.operation == operation)
                .map(|e| e.percent)
                .collect();
            assert!(!phase.is_empty(), "{operation:?} phase emitted no events");
            assert!(phase.windows(2).all(|w| w[0] <= w[1]));
            assert_eq!(*phase.last().unwrap(), 100);
        }

        // Moving precedes Installing.
        let first_installing = events
            .iter()
            .position(|e| e.operation == Operation::Installing)
            .unwrap();
        assert!(events[..first_installing]
            .iter()
            .any(|e| e.operation == Operation::Moving));
    }

    #[test]
    fn test_reinstall_clears_stale_files() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("download.pak");
        write_sample_archive(&archive);

        let repo = Repository::new(temp.path().join("repo")).unwrap();
        let identity = repo.install(&archive, &mut |_| {}).unwrap();

        let package_dir = layout::package_dir(repo.install_root(), &identity);
        let first_install = tree_files(&package_dir);
        std::fs::write(package_dir.join("stale.tmp"), b"left by a failed run").unwrap();

        let mut events = Vec::new();
        repo.install(&archive, &mut |e| events.push(e)).unwrap();

        assert_eq!(tree_files(&package_dir), first_install);
        assert!(!package_dir.join("stale.tmp").exists());

        // The reinstall deleted the prior tree file by file.
        let deleting: Vec<u8> = events
            .iter()
            .filter(|e| e.operation == Operation::Deleting)
            .map(|e| e.percent)
            .collect();
        assert!(!deleting.is_empty());
        assert_eq!(*deleting.last().unwrap(), 100);
    }

    #[test]
    fn test_install_then_uninstall_round_trip() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("repo");
        let archive = temp.path().join("download.pak");
        write_sample_archive(&archive);

        let repo = Repository::new(&root).unwrap();
        let before = dir_entries(&root);

        let identity = repo.install(&archive, &mut |_| {}).unwrap();
        assert_ne!(dir_entries(&root), before);

        repo.uninstall(&identity, &mut |_| {}).unwrap();
        assert_eq!(dir_entries(&root), before);
    }

    #[test]
    fn test_uninstall_missing_package_is_no_op() {
        let temp = TempDir::new().unwrap();
        let repo = Repository::new(temp.path().join("repo")).unwrap();
        let identity = PackageIdentity::parse("Ghost", "1.0.0").unwrap();

        let mut events = Vec::new();
        repo.uninstall(&identity, &mut |e| events.push(e)).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_original_archive_is_disposable_after_install() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("download.pak");
        write_sample_archive(&archive);

        let repo = Repository::new(temp.path().join("repo")).unwrap();
        let identity = repo.install(&archive, &mut |_| {}).unwrap();
        std::fs::remove_file(&archive).unwrap();

        // The persisted copy remains a readable package container.
        let persisted = layout::archive_path(repo.install_root(), &identity);
        let package = ZipPackage::open(&persisted).unwrap();
        assert_eq!(package.identity(), &identity);
    }

    #[test]
    fn test_installed_packages_listing() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("download.pak");
        write_sample_archive(&archive);

        let repo = Repository::new(temp.path().join("repo")).unwrap();
        repo.install(&archive, &mut |_| {}).unwrap();
        // A non-package directory is ignored.
        std::fs::create_dir(repo.install_root().join("scratch")).unwrap();

        let installed = repo.installed_packages().unwrap();
        assert_eq!(installed.len(), 1);
        assert_eq!(installed[0].full_name(), "Sample.2.1.0");
    }

    #[test]
    fn test_installing_progress_spans_multiple_parts() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("multi.pak");

        let file = File::create(&archive).unwrap();
        let mut writer = ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        writer.start_file("Multi.1.0.0.pakspec", options).unwrap();
        writer
            .write_all(br#"{"name":"Multi","version":"1.0.0"}"#)
            .unwrap();
        writer.start_file("bin/a.exe", options).unwrap();
        writer.write_all(&[1u8; 10]).unwrap();
        writer.start_file("readme.txt", options).unwrap();
        writer.start_file("lib/data.bin", options).unwrap();
        writer.write_all(&[2u8; 10]).unwrap();
        writer.finish().unwrap();

        let repo = Repository::new(temp.path().join("repo")).unwrap();
        let mut events = Vec::new();
        repo.install(&archive, &mut |e| events.push(e)).unwrap();

        let installing: Vec<u8> = events
            .iter()
            .filter(|e| e.operation == Operation::Installing)
            .map(|e| e.percent)
            .collect();

        // Rescaled across parts: no reset back to a lower percentage.
        assert!(installing.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*installing.last().unwrap(), 100);
        assert_eq!(installing.iter().filter(|p| **p == 100).count(), 1);

        // The zero-byte part still materialized as an empty file.
        let readme = temp.path().join("repo/Multi.1.0.0/readme.txt");
        assert_eq!(std::fs::metadata(&readme).unwrap().len(), 0);
    }

    #[test]
    fn test_install_corrupt_archive_fails() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("broken.pak");
        std::fs::write(&archive, b"truncated download").unwrap();

        let repo = Repository::new(temp.path().join("repo")).unwrap();
        let err = repo.install(&archive, &mut |_| {}).unwrap_err();
        assert!(matches!(err, NupakError::CorruptArchive { .. }));
    }
}
