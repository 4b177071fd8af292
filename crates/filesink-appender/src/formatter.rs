//! Record formatting interface and a plain line formatter.

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::Level;

/// Renders events as text, with optional file and presentation decorations.
///
/// Decoration strings that are `None` or empty are skipped.
pub trait Formatter<E>: Send + Sync {
    /// Formats a single event.
    fn format(&self, event: &E) -> String;

    /// Text written once at the start of the file.
    fn file_header(&self) -> Option<String> {
        None
    }

    /// Text written after the file header when the file is opened.
    fn presentation_header(&self) -> Option<String> {
        None
    }

    /// Text written before the file footer when the file is closed.
    fn presentation_footer(&self) -> Option<String> {
        None
    }

    /// Text written last when the file is closed.
    fn file_footer(&self) -> Option<String> {
        None
    }
}

/// A log event as rendered by [`LineFormatter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// Severity.
    pub level: Level,
    /// Logical source of the event.
    pub target: String,
    /// Message text.
    pub message: String,
}

impl LogEvent {
    /// Creates an event stamped with the current time.
    pub fn new(level: Level, target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            target: target.into(),
            message: message.into(),
        }
    }

    /// Replaces the timestamp.
    #[must_use]
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Formats [`LogEvent`]s as single lines.
///
/// The full layout is `<rfc3339 millis> <LEVEL> [target] message\n`; the
/// message-only layout is `message\n`.
#[derive(Debug, Clone, Default)]
pub struct LineFormatter {
    message_only: bool,
    file_header: Option<String>,
    presentation_header: Option<String>,
    presentation_footer: Option<String>,
    file_footer: Option<String>,
}

impl LineFormatter {
    /// Creates a formatter using the full layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a formatter that writes only the message.
    pub fn message_only() -> Self {
        Self {
            message_only: true,
            ..Self::default()
        }
    }

    /// Sets the file header.
    #[must_use]
    pub fn with_file_header(mut self, header: impl Into<String>) -> Self {
        self.file_header = Some(header.into());
        self
    }

    /// Sets the presentation header.
    #[must_use]
    pub fn with_presentation_header(mut self, header: impl Into<String>) -> Self {
        self.presentation_header = Some(header.into());
        self
    }

    /// Sets the presentation footer.
    #[must_use]
    pub fn with_presentation_footer(mut self, footer: impl Into<String>) -> Self {
        self.presentation_footer = Some(footer.into());
        self
    }

    /// Sets the file footer.
    #[must_use]
    pub fn with_file_footer(mut self, footer: impl Into<String>) -> Self {
        self.file_footer = Some(footer.into());
        self
    }
}

impl Formatter<LogEvent> for LineFormatter {
    fn format(&self, event: &LogEvent) -> String {
        if self.message_only {
            return format!("{}\n", event.message);
        }
        format!(
            "{} {:<5} [{}] {}\n",
            event.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            event.level.to_string(),
            event.target,
            event.message
        )
    }

    fn file_header(&self) -> Option<String> {
        self.file_header.clone()
    }

    fn presentation_header(&self) -> Option<String> {
        self.presentation_header.clone()
    }

    fn presentation_footer(&self) -> Option<String> {
        self.presentation_footer.clone()
    }

    fn file_footer(&self) -> Option<String> {
        self.file_footer.clone()
    }
}
