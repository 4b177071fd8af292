//! Cross-process safe writes for files shared between processes.
//!
//! Each write takes an exclusive advisory lock on the file, moves the write
//! cursor to the end-of-data reported by the filesystem, writes, flushes and
//! releases the lock. No length is cached between writes: other processes
//! may have appended since the last one, so the filesystem is the only
//! reliable source for where the file ends.
//!
//! The lock is advisory. Only writers that take it are excluded. If a process
//! dies while holding it, the operating system releases it.

use fs2::FileExt;
use std::fs::File;
use std::io::{self, Seek, SeekFrom, Write};

/// Exclusive advisory lock on a whole file, released on drop.
#[derive(Debug)]
pub struct ExclusiveLock<'a> {
    file: &'a File,
}

impl<'a> ExclusiveLock<'a> {
    /// Blocks until an exclusive lock on `file` is obtained.
    pub fn acquire(file: &'a File) -> io::Result<Self> {
        FileExt::lock_exclusive(file)?;
        Ok(Self { file })
    }
}

impl Drop for ExclusiveLock<'_> {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(self.file) {
            tracing::warn!(error = %e, "failed to release advisory file lock");
        }
    }
}

/// Moves the cursor of `file` to its current end-of-data.
///
/// Returns the end-of-data offset.
pub fn resync_to_end(mut file: &File) -> io::Result<u64> {
    let position = file.stream_position()?;
    let end = file.metadata()?.len();
    if position != end {
        tracing::debug!(position, end, "resynchronizing write cursor to end of file");
        file.seek(SeekFrom::Start(end))?;
    }
    Ok(end)
}

/// Writes `bytes` through `stream` at the end of `file` while holding an
/// exclusive lock on it.
///
/// `stream` must write to the same open file as `file`, so that moving the
/// cursor of one moves the cursor of the other. The write is always flushed.
pub fn write_exclusive(file: &File, stream: &mut dyn Write, bytes: &[u8]) -> io::Result<()> {
    let _lock = ExclusiveLock::acquire(file)?;
    resync_to_end(file)?;
    stream.write_all(bytes)?;
    stream.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, OpenOptions};
    use tempfile::TempDir;

    fn open_for_write(path: &std::path::Path) -> File {
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .unwrap()
    }

    #[test]
    fn resync_moves_stale_cursor_to_end() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("shared.log");
        let ours = open_for_write(&path);
        fs::write(&path, b"written elsewhere\n").unwrap();

        assert_eq!(resync_to_end(&ours).unwrap(), 18);
        assert_eq!((&ours).stream_position().unwrap(), 18);
    }

    #[test]
    fn stale_writers_do_not_overwrite_each_other() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("shared.log");
        let first = open_for_write(&path);
        let second = open_for_write(&path);
        let mut first_stream = first.try_clone().unwrap();
        let mut second_stream = second.try_clone().unwrap();

        write_exclusive(&first, &mut first_stream, b"one\n").unwrap();
        write_exclusive(&second, &mut second_stream, b"two\n").unwrap();
        write_exclusive(&first, &mut first_stream, b"three\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\nthree\n");
    }

    #[test]
    fn lock_is_released_after_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("shared.log");
        let file = open_for_write(&path);
        let mut stream = file.try_clone().unwrap();
        write_exclusive(&file, &mut stream, b"x").unwrap();

        let other = open_for_write(&path);
        FileExt::try_lock_exclusive(&other).unwrap();
        FileExt::unlock(&other).unwrap();
    }
}
