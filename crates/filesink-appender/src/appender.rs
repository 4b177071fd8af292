//! File appender lifecycle.

use crate::channel::{ChannelOptions, OutputChannel};
use crate::config::FileConfig;
use crate::decorator::DecoratedChannel;
use crate::encoder::{Charset, Encoder};
use crate::formatter::Formatter;
use filesink_status::{Status, StatusReporter, StatusSink};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Name used for status reports when none is configured.
pub const DEFAULT_NAME: &str = "file";

/// Lifecycle state of an appender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LifecycleState {
    /// Not started yet, or the last start failed on configuration.
    Unstarted = 0,
    /// Accepting records.
    Started = 1,
    /// Stopped explicitly or by an I/O failure. Appends are ignored until the
    /// appender is started again.
    Stopped = 2,
}

#[derive(Debug)]
struct StateCell(AtomicU8);

impl StateCell {
    fn new(state: LifecycleState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    fn load(&self) -> LifecycleState {
        match self.0.load(Ordering::Acquire) {
            1 => LifecycleState::Started,
            2 => LifecycleState::Stopped,
            _ => LifecycleState::Unstarted,
        }
    }

    fn store(&self, state: LifecycleState) {
        self.0.store(state as u8, Ordering::Release);
    }
}

/// Appends formatted records to a file.
///
/// Configure with the setters, then call [`start`](Self::start). Failures
/// never reach the caller of [`append`](Self::append): they are reported to
/// the status sink and the appender moves to [`LifecycleState::Stopped`].
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use filesink_appender::{FileAppender, FileConfig, LineFormatter, LogEvent};
/// use filesink_status::StatusManager;
/// use tracing::Level;
///
/// let dir = tempfile::tempdir()?;
/// let status = Arc::new(StatusManager::new());
/// let mut appender = FileAppender::new(status.clone())
///     .with_config(FileConfig::default().with_file(dir.path().join("app.log").to_string_lossy()))
///     .with_formatter(Arc::new(LineFormatter::new()));
///
/// appender.start();
/// appender.append(&LogEvent::new(Level::INFO, "app", "ready"));
/// appender.stop();
/// assert_eq!(status.count(filesink_status::Level::Error), 0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct FileAppender<E> {
    name: String,
    configured: FileConfig,
    effective: FileConfig,
    charset: Charset,
    formatter: Option<Arc<dyn Formatter<E>>>,
    status: StatusReporter,
    state: StateCell,
    output: Mutex<Option<DecoratedChannel<E>>>,
}

impl<E> FileAppender<E> {
    /// Creates an unstarted appender reporting to `status`.
    pub fn new(status: Arc<dyn StatusSink>) -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            configured: FileConfig::default(),
            effective: FileConfig::default(),
            charset: Charset::platform_default(),
            formatter: None,
            status: StatusReporter::new(DEFAULT_NAME, status),
            state: StateCell::new(LifecycleState::Unstarted),
            output: Mutex::new(None),
        }
    }

    /// Sets the appender name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.set_name(name);
        self
    }

    /// Replaces the whole configuration.
    #[must_use]
    pub fn with_config(mut self, config: FileConfig) -> Self {
        self.configured = config;
        self
    }

    /// Sets the formatter.
    #[must_use]
    pub fn with_formatter(mut self, formatter: Arc<dyn Formatter<E>>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Sets the appender name, used as the origin of status reports.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.status.set_origin(self.name.clone());
    }

    /// Replaces the whole configuration. Takes effect on the next start.
    pub fn set_config(&mut self, config: FileConfig) {
        self.configured = config;
    }

    /// Sets the destination path, trimming surrounding whitespace.
    pub fn set_file(&mut self, file: impl AsRef<str>) {
        self.configured.file = Some(file.as_ref().trim().to_string());
    }

    /// Sets the append flag.
    pub fn set_append(&mut self, append: bool) {
        self.configured.append = append;
    }

    /// Sets the immediate-flush flag.
    pub fn set_immediate_flush(&mut self, immediate_flush: bool) {
        self.configured.immediate_flush = immediate_flush;
    }

    /// Enables or disables buffered output.
    pub fn set_buffered_io(&mut self, buffered_io: bool) {
        self.configured.buffered_io = buffered_io;
    }

    /// Sets the buffer capacity.
    pub fn set_buffer_size(&mut self, buffer_size: usize) {
        self.configured.buffer_size = buffer_size;
    }

    /// Enables or disables prudent mode.
    pub fn set_prudent(&mut self, prudent: bool) {
        self.configured.prudent = prudent;
    }

    /// Sets the character encoding name.
    pub fn set_encoding(&mut self, encoding: impl Into<String>) {
        self.configured.encoding = Some(encoding.into());
    }

    /// Sets the formatter.
    pub fn set_formatter(&mut self, formatter: Arc<dyn Formatter<E>>) {
        self.formatter = Some(formatter);
    }

    /// Appender name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Settings as configured, before reconciliation.
    pub fn configured(&self) -> &FileConfig {
        &self.configured
    }

    /// Settings in effect since the last start.
    pub fn config(&self) -> &FileConfig {
        &self.effective
    }

    /// Charset resolved by the last start.
    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.state.load()
    }

    /// Returns `true` while records are accepted.
    pub fn is_started(&self) -> bool {
        self.state() == LifecycleState::Started
    }

    /// Validates the configuration, opens the file and writes the header.
    ///
    /// Problems are reported to the status sink. The appender is started
    /// only if none of them is an error.
    pub fn start(&mut self) {
        if self.is_started() {
            self.status
                .warn(format!("Appender named [{}] is already started.", self.name));
            return;
        }

        let mut errors = 0;
        let mut header_failed = false;
        let mut config = self.configured.clone();

        for adjustment in config.reconcile() {
            self.status.report(Status::new(
                adjustment.level,
                adjustment.message,
                self.name.as_str(),
            ));
        }

        let resolved = match config.encoding.as_deref() {
            Some(name) => Charset::for_name(name).map_err(|e| (name.to_string(), e)),
            None => Ok(Charset::platform_default()),
        };
        let charset = resolved.as_ref().map_or(Charset::platform_default(), |c| *c);

        // A previous channel, if any, gets its footer before being replaced.
        self.close_output();

        let mut output = None;
        match config.file_path() {
            Some(path) => {
                self.status
                    .info(format!("File property is set to [{}]", path.display()));
                match self.open_output(&path, &config, charset) {
                    Ok((channel, header_ok)) => {
                        header_failed = !header_ok;
                        output = Some(channel);
                    }
                    Err(e) => {
                        errors += 1;
                        self.status.error_with(
                            format!("openFile({},{}) call failed.", path.display(), config.append),
                            e,
                        );
                    }
                }
            }
            None => {
                errors += 1;
                self.status.error(format!(
                    "\"File\" property not set for appender named [{}].",
                    self.name
                ));
            }
        }

        if self.formatter.is_none() {
            errors += 1;
            self.status
                .error(format!("No formatter set for the appender named [{}].", self.name));
        }

        if let Err((name, e)) = resolved {
            self.status.warn_with(
                format!(
                    "Could not resolve charset-encoding \"{}\" for the appender named [{}]! Using default charset as fallback.",
                    name, self.name
                ),
                e,
            );
        }

        if output.is_none() {
            errors += 1;
            self.status.error(format!(
                "No output stream set for the appender named [{}].",
                self.name
            ));
        }

        self.effective = config;
        self.charset = charset;
        *self.output.get_mut() = output;

        if header_failed {
            self.state.store(LifecycleState::Stopped);
        } else if errors == 0 {
            self.state.store(LifecycleState::Started);
        }
    }

    /// Opens the channel and writes the header. The flag is `false` if the
    /// header write failed; that failure has already been reported.
    fn open_output(
        &self,
        path: &Path,
        config: &FileConfig,
        charset: Charset,
    ) -> std::io::Result<(DecoratedChannel<E>, bool)> {
        let channel = OutputChannel::open(path, &ChannelOptions::from(config), &self.status)?;
        let mut decorated =
            DecoratedChannel::new(channel, self.formatter.clone(), Encoder::new(charset));

        let header_ok = match decorated.write_header() {
            Ok(()) => true,
            Err(e) => {
                self.status.error_with(
                    format!("Failed to write header for appender named [{}].", self.name),
                    e,
                );
                false
            }
        };
        Ok((decorated, header_ok))
    }

    /// Formats `event` and writes it to the file.
    ///
    /// Does nothing unless started. The first I/O failure stops the appender
    /// and is reported once; later calls are no-ops.
    pub fn append(&self, event: &E) {
        if !self.is_started() {
            return;
        }
        let Some(formatter) = &self.formatter else {
            return;
        };
        let text = formatter.format(event);

        let mut output = self.output.lock();
        // Another caller may have stopped the appender while we waited.
        if !self.is_started() {
            return;
        }
        let Some(channel) = output.as_mut() else {
            return;
        };
        if let Err(e) = channel.write_text(&text, self.effective.immediate_flush) {
            self.state.store(LifecycleState::Stopped);
            self.status.error_with("IO failure in appender", e);
        }
    }

    /// Flushes buffered records to the file.
    ///
    /// A failure is treated like a failed append.
    pub fn flush(&self) {
        let mut output = self.output.lock();
        if !self.is_started() {
            return;
        }
        let Some(channel) = output.as_mut() else {
            return;
        };
        if let Err(e) = channel.flush() {
            self.state.store(LifecycleState::Stopped);
            self.status.error_with("IO failure in appender", e);
        }
    }

    /// Writes the footer, flushes and releases the file.
    ///
    /// Safe to call repeatedly and on an appender that never started.
    pub fn stop(&self) {
        let mut output = self.output.lock();
        let was_started = self.is_started();
        if was_started {
            self.state.store(LifecycleState::Stopped);
        }
        if let Some(mut channel) = output.take() {
            self.close_channel(&mut channel, was_started);
        }
    }

    fn close_output(&mut self) {
        let was_started = self.is_started();
        if let Some(mut channel) = self.output.get_mut().take() {
            self.close_channel(&mut channel, was_started);
        }
    }

    // Footers are only written by a healthy appender; a failed one has
    // already reported its I/O error.
    fn close_channel(&self, channel: &mut DecoratedChannel<E>, write_footer: bool) {
        if write_footer {
            if let Err(e) = channel.write_footer() {
                self.status.error_with(
                    format!("Failed to write footer for appender named [{}].", self.name),
                    e,
                );
            }
        }
        if let Err(e) = channel.release() {
            self.status.error_with(
                format!("Could not close output stream for appender named [{}].", self.name),
                e,
            );
        }
    }
}

impl<E> Drop for FileAppender<E> {
    fn drop(&mut self) {
        self.close_output();
    }
}

impl<E> std::fmt::Debug for FileAppender<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileAppender")
            .field("name", &self.name)
            .field("state", &self.state())
            .field("config", &self.effective)
            .field("charset", &self.charset)
            .finish_non_exhaustive()
    }
}
