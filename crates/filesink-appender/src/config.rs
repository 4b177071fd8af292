//! Destination settings and the start-time reconciliation policy.

use crate::errors::AppenderError;
use filesink_status::Level;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// Default size of the in-memory write buffer (8 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

/// Settings for a file destination.
///
/// Missing fields in a deserialized document take their default values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Destination path, trimmed of surrounding whitespace.
    #[serde(deserialize_with = "deserialize_trimmed")]
    pub file: Option<String>,
    /// Append to an existing file instead of truncating it (default: true).
    pub append: bool,
    /// Flush after every record (default: true).
    pub immediate_flush: bool,
    /// Wrap the file in an in-memory buffer (default: false).
    pub buffered_io: bool,
    /// Capacity of the in-memory buffer in bytes (default: 8192).
    pub buffer_size: usize,
    /// Lock and resynchronize on every write so several processes can share
    /// the file (default: false).
    pub prudent: bool,
    /// Character encoding name; the platform default when unset.
    pub encoding: Option<String>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            file: None,
            append: true,
            immediate_flush: true,
            buffered_io: false,
            buffer_size: DEFAULT_BUFFER_SIZE,
            prudent: false,
            encoding: None,
        }
    }
}

/// A setting that [`FileConfig::reconcile`] overrode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjustment {
    /// Severity to report the adjustment at.
    pub level: Level,
    /// Name of the overridden setting.
    pub setting: &'static str,
    /// Explanation suitable for a status report.
    pub message: String,
}

impl Adjustment {
    fn warn(setting: &'static str, message: String) -> Self {
        Self {
            level: Level::Warn,
            setting,
            message,
        }
    }
}

impl FileConfig {
    /// Parses a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, AppenderError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the destination path.
    #[must_use]
    pub fn with_file(mut self, file: impl AsRef<str>) -> Self {
        self.file = Some(file.as_ref().trim().to_string());
        self
    }

    /// Sets the append flag.
    #[must_use]
    pub fn with_append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    /// Sets the immediate-flush flag.
    #[must_use]
    pub fn with_immediate_flush(mut self, immediate_flush: bool) -> Self {
        self.immediate_flush = immediate_flush;
        self
    }

    /// Enables or disables buffered output.
    #[must_use]
    pub fn with_buffered_io(mut self, buffered_io: bool) -> Self {
        self.buffered_io = buffered_io;
        self
    }

    /// Sets the buffer capacity used when buffered output is enabled.
    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Enables or disables prudent mode.
    #[must_use]
    pub fn with_prudent(mut self, prudent: bool) -> Self {
        self.prudent = prudent;
        self
    }

    /// Sets the character encoding name.
    #[must_use]
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// Returns the destination path, or `None` if unset or blank.
    pub fn file_path(&self) -> Option<PathBuf> {
        self.file
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(PathBuf::from)
    }

    /// Resolves conflicting settings in place and returns what was changed.
    ///
    /// Prudent mode requires append, immediate flush and no buffering; each
    /// conflicting setting is corrected with a warning. Buffered output
    /// always disables immediate flush, reported at info level. A zero
    /// buffer size is replaced with [`DEFAULT_BUFFER_SIZE`].
    pub fn reconcile(&mut self) -> Vec<Adjustment> {
        let mut adjustments = Vec::new();

        if self.prudent {
            if !self.append {
                self.append = true;
                adjustments.push(Adjustment::warn(
                    "append",
                    "Setting \"Append\" property to true on account of \"Prudent\" mode".into(),
                ));
            }
            if !self.immediate_flush {
                self.immediate_flush = true;
                adjustments.push(Adjustment::warn(
                    "immediate_flush",
                    "Setting \"ImmediateFlush\" to true on account of \"Prudent\" mode".into(),
                ));
            }
            if self.buffered_io {
                self.buffered_io = false;
                adjustments.push(Adjustment::warn(
                    "buffered_io",
                    "Setting \"BufferedIO\" property to false on account of \"Prudent\" mode"
                        .into(),
                ));
            }
        }

        if self.buffered_io {
            if self.buffer_size == 0 {
                self.buffer_size = DEFAULT_BUFFER_SIZE;
                adjustments.push(Adjustment::warn(
                    "buffer_size",
                    format!(
                        "Buffer size must be positive, using default of {} bytes",
                        DEFAULT_BUFFER_SIZE
                    ),
                ));
            }
            self.immediate_flush = false;
            adjustments.push(Adjustment {
                level: Level::Info,
                setting: "immediate_flush",
                message:
                    "Setting \"ImmediateFlush\" property to false on account of \"bufferedIO\" property"
                        .into(),
            });
        }

        adjustments
    }
}

fn deserialize_trimmed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(|s| s.trim().to_string()))
}
