use crate::manager::StatusSink;
use crate::status::{Level, Status};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Per-component handle for emitting status reports.
///
/// Carries the component name so call sites only supply the message.
#[derive(Clone)]
pub struct StatusReporter {
    origin: String,
    sink: Arc<dyn StatusSink>,
}

impl StatusReporter {
    /// Creates a reporter for the component named `origin`.
    pub fn new(origin: impl Into<String>, sink: Arc<dyn StatusSink>) -> Self {
        Self {
            origin: origin.into(),
            sink,
        }
    }

    /// Name of the reporting component.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Renames the reporting component.
    pub fn set_origin(&mut self, origin: impl Into<String>) {
        self.origin = origin.into();
    }

    /// Records an info status.
    pub fn info(&self, message: impl Into<String>) {
        self.report(Status::new(Level::Info, message, self.origin.as_str()));
    }

    /// Records a warning status.
    pub fn warn(&self, message: impl Into<String>) {
        self.report(Status::new(Level::Warn, message, self.origin.as_str()));
    }

    /// Records a warning status with an underlying cause.
    pub fn warn_with<E>(&self, message: impl Into<String>, cause: E)
    where
        E: Error + Send + Sync + 'static,
    {
        self.report(Status::new(Level::Warn, message, self.origin.as_str()).with_cause(cause));
    }

    /// Records an error status.
    pub fn error(&self, message: impl Into<String>) {
        self.report(Status::new(Level::Error, message, self.origin.as_str()));
    }

    /// Records an error status with an underlying cause.
    pub fn error_with<E>(&self, message: impl Into<String>, cause: E)
    where
        E: Error + Send + Sync + 'static,
    {
        self.report(Status::new(Level::Error, message, self.origin.as_str()).with_cause(cause));
    }

    /// Records a prepared status as is.
    pub fn report(&self, status: Status) {
        self.sink.add(status);
    }
}

impl fmt::Debug for StatusReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusReporter")
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}
