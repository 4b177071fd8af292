//! Output channel owning the destination file.

use crate::config::FileConfig;
use crate::errors::AppenderError;
use crate::prudent;
use filesink_status::StatusReporter;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Options for opening an output channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelOptions {
    /// Append to an existing file (default: true). Truncates when `false`.
    pub append: bool,
    /// Wrap the file in an in-memory buffer (default: false).
    pub buffered_io: bool,
    /// Buffer capacity in bytes (default: 8192).
    pub buffer_size: usize,
    /// Keep a lockable handle and write through the prudent path
    /// (default: false).
    pub prudent: bool,
}

impl Default for ChannelOptions {
    fn default() -> Self {
        Self::from(&FileConfig::default())
    }
}

impl From<&FileConfig> for ChannelOptions {
    fn from(config: &FileConfig) -> Self {
        Self {
            append: config.append,
            buffered_io: config.buffered_io,
            buffer_size: config.buffer_size,
            prudent: config.prudent,
        }
    }
}

/// A single open destination.
///
/// Writes go straight to the stream, or through [`prudent::write_exclusive`]
/// when the channel was opened in prudent mode.
pub struct OutputChannel {
    path: Option<PathBuf>,
    stream: Option<Box<dyn Write + Send>>,
    lock_handle: Option<File>,
}

impl OutputChannel {
    /// Opens `path` for writing.
    ///
    /// Missing parent directories are created first. A failure to create them
    /// is reported through `status` and the open is attempted anyway.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be opened or positioned.
    pub fn open<P: AsRef<Path>>(
        path: P,
        options: &ChannelOptions,
        status: &StatusReporter,
    ) -> io::Result<Self> {
        let path = path.as_ref();
        create_missing_parents(path, status);

        let stream: Box<dyn Write + Send>;
        let mut lock_handle = None;

        if options.prudent {
            // Positioned explicitly on every write, so no O_APPEND here.
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(!options.append)
                .open(path)?;
            file.seek(SeekFrom::End(0))?;
            lock_handle = Some(file.try_clone()?);
            stream = Box::new(file);
        } else {
            let mut open_options = OpenOptions::new();
            open_options.create(true);
            if options.append {
                open_options.append(true);
            } else {
                open_options.write(true).truncate(true);
            }
            let file = open_options.open(path)?;
            stream = if options.buffered_io {
                Box::new(BufWriter::with_capacity(options.buffer_size, file))
            } else {
                Box::new(file)
            };
        }

        tracing::debug!(
            path = %path.display(),
            append = options.append,
            buffered = options.buffered_io,
            prudent = options.prudent,
            "opened output channel"
        );

        Ok(Self {
            path: Some(path.to_path_buf()),
            stream: Some(stream),
            lock_handle,
        })
    }

    /// Wraps an arbitrary writer. The channel never locks.
    pub fn from_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            path: None,
            stream: Some(Box::new(writer)),
            lock_handle: None,
        }
    }

    /// Destination path, if the channel was opened from one.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns `true` until [`close`](Self::close) is called.
    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Returns `true` if writes go through the prudent path.
    pub fn is_prudent(&self) -> bool {
        self.lock_handle.is_some()
    }

    /// Writes `bytes`, flushing the stream if `flush` is set.
    ///
    /// Prudent channels always flush.
    pub fn write(&mut self, bytes: &[u8], flush: bool) -> Result<(), AppenderError> {
        let stream = self.stream.as_mut().ok_or(AppenderError::ChannelClosed)?;
        match &self.lock_handle {
            Some(file) => prudent::write_exclusive(file, &mut **stream, bytes)?,
            None => {
                stream.write_all(bytes)?;
                if flush {
                    stream.flush()?;
                }
            }
        }
        Ok(())
    }

    /// Flushes buffered bytes to the file.
    pub fn flush(&mut self) -> Result<(), AppenderError> {
        let stream = self.stream.as_mut().ok_or(AppenderError::ChannelClosed)?;
        stream.flush()?;
        Ok(())
    }

    /// Flushes and releases the file. Closing a closed channel does nothing.
    pub fn close(&mut self) -> io::Result<()> {
        self.lock_handle = None;
        let Some(mut stream) = self.stream.take() else {
            return Ok(());
        };
        stream.flush()?;
        if let Some(path) = &self.path {
            tracing::debug!(path = %path.display(), "closed output channel");
        }
        Ok(())
    }
}

impl std::fmt::Debug for OutputChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputChannel")
            .field("path", &self.path)
            .field("open", &self.is_open())
            .field("prudent", &self.is_prudent())
            .finish()
    }
}

fn create_missing_parents(path: &Path, status: &StatusReporter) {
    let Some(parent) = path.parent() else {
        return;
    };
    if parent.as_os_str().is_empty() || parent.exists() {
        return;
    }
    if let Err(e) = fs::create_dir_all(parent) {
        status.error_with(
            format!("Failed to create parent directories for [{}]", parent.display()),
            e,
        );
    }
}
