use crate::status::{Level, Status};
use parking_lot::Mutex;

/// Destination for status reports.
///
/// Implementations must be cheap to call from any thread; components report
/// while holding their own write locks.
pub trait StatusSink: Send + Sync {
    /// Records a status report.
    fn add(&self, status: Status);
}

/// In-memory status sink.
///
/// Every report is kept in insertion order and mirrored to `tracing` at the
/// matching level, so a process with a subscriber installed sees component
/// diagnostics alongside its own logs.
#[derive(Debug, Default)]
pub struct StatusManager {
    statuses: Mutex<Vec<Status>>,
}

impl StatusManager {
    /// Creates an empty status manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all recorded statuses.
    pub fn statuses(&self) -> Vec<Status> {
        self.statuses.lock().clone()
    }

    /// Counts statuses recorded at exactly `level`.
    pub fn count(&self, level: Level) -> usize {
        self.statuses
            .lock()
            .iter()
            .filter(|s| s.level == level)
            .count()
    }

    /// Returns the most severe level recorded so far.
    pub fn highest_level(&self) -> Option<Level> {
        self.statuses.lock().iter().map(|s| s.level).max()
    }

    /// Returns the number of recorded statuses.
    pub fn len(&self) -> usize {
        self.statuses.lock().len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.statuses.lock().is_empty()
    }

    /// Discards all recorded statuses.
    pub fn clear(&self) {
        self.statuses.lock().clear();
    }
}

impl StatusSink for StatusManager {
    fn add(&self, status: Status) {
        match (status.level, &status.cause) {
            (Level::Info, _) => tracing::info!(origin = %status.origin, "{}", status.message),
            (Level::Warn, None) => tracing::warn!(origin = %status.origin, "{}", status.message),
            (Level::Warn, Some(cause)) => {
                tracing::warn!(origin = %status.origin, cause = %cause, "{}", status.message)
            }
            (Level::Error, None) => tracing::error!(origin = %status.origin, "{}", status.message),
            (Level::Error, Some(cause)) => {
                tracing::error!(origin = %status.origin, cause = %cause, "{}", status.message)
            }
        }
        self.statuses.lock().push(status);
    }
}
