use crate::core::progress::{Operation, ProgressEvent, ProgressSink};
use crate::error::Result;
use crate::utils::fs;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

const CHUNK_SIZE: usize = 1024 * 1024; // 1 MiB

/// Copy a byte stream of known total length to `dest`, creating intervening
/// directories and truncating any existing file. After each chunk the sink
/// receives `floor(bytes_written * 100 / total_len)` tagged with `operation`.
///
/// A zero-length source emits a single terminal 100% event and leaves an
/// empty destination file. On I/O failure a partially written destination is
/// left in place; callers needing atomicity wrap this themselves.
pub fn write_with_progress<R: Read>(
    source: &mut R,
    total_len: u64,
    dest: &Path,
    operation: Operation,
    progress: &mut ProgressSink<'_>,
) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::ensure_dir_exists(parent)?;
    }

    let mut output = File::create(dest)?;

    if total_len == 0 {
        progress(ProgressEvent::new(operation, 100));
        return Ok(());
    }

    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut bytes_written: u64 = 0;

    loop {
        let read = source.read(&mut buffer)?;
        if read == 0 {
            break;
        }

        output.write_all(&buffer[..read])?;
        bytes_written += read as u64;

        let percent = (bytes_written * 100 / total_len).min(100) as u8;
        progress(ProgressEvent::new(operation, percent));
    }

    Ok(())
}
