use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Shared handle to the error behind a status.
pub type Cause = Arc<dyn Error + Send + Sync>;

/// Severity of a status report.
///
/// Ordered so that `Info < Warn < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Informational message about a configuration decision.
    Info,
    /// Recoverable problem; a safe default was substituted.
    Warn,
    /// Failure that prevented start or forced the component to stop.
    Error,
}

impl Level {
    /// Returns the upper-case name of the level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single leveled report emitted by a component.
#[derive(Debug, Clone)]
pub struct Status {
    /// Severity of the report.
    pub level: Level,
    /// Human-readable message.
    pub message: String,
    /// Name of the reporting component.
    pub origin: String,
    /// Underlying error, if any.
    pub cause: Option<Cause>,
    /// When the report was recorded.
    pub timestamp: DateTime<Utc>,
}

impl Status {
    /// Creates a status without a cause.
    pub fn new(level: Level, message: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            origin: origin.into(),
            cause: None,
            timestamp: Utc::now(),
        }
    }

    /// Attaches an underlying error.
    #[must_use]
    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.cause = Some(Arc::new(cause));
        self
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {} - {}", self.level, self.origin, self.message)?;
        if let Some(cause) = &self.cause {
            write!(f, ": {}", cause)?;
        }
        Ok(())
    }
}
