use crate::core::progress::{Operation, ProgressEvent, ProgressSink};
use crate::error::Result;
use crate::utils::fs;
use std::path::Path;
use std::time::Duration;

/// Recursively delete `dir`, reporting per-file progress.
///
/// Files are deleted one at a time; after each deletion the sink receives
/// `Deleting` with `floor((i + 1) * 100 / file_count)`. Once all files are
/// gone the remaining empty directory tree is removed. A missing directory is
/// a successful no-op with zero events.
///
/// `pacing` inserts a delay between file deletions so progress stays visible
/// to a human observer; `None` deletes at full speed. Files already deleted
/// stay deleted if a later removal fails.
pub fn delete_dir_with_progress(
    dir: &Path,
    pacing: Option<Duration>,
    progress: &mut ProgressSink<'_>,
) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }

    let files = fs::collect_files(dir)?;
    let count = files.len() as u64;

    for (index, file) in files.iter().enumerate() {
        std::fs::remove_file(file)?;

        let percent = ((index as u64 + 1) * 100 / count) as u8;
        progress(ProgressEvent::new(Operation::Deleting, percent));

        if let Some(delay) = pacing {
            if (index as u64) + 1 < count {
                std::thread::sleep(delay);
            }
        }
    }

    std::fs::remove_dir_all(dir)?;
    Ok(())
}
