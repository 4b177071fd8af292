//! Leveled status reports for filesink components.
//!
//! Components never surface operational failures as panics or errors to
//! their callers. Instead they record a [`Status`] with a [`Level`], the
//! reporting component and an optional cause, and callers inspect the
//! [`StatusManager`] to find out what went wrong.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use filesink_status::{Level, StatusManager, StatusReporter};
//!
//! let manager = Arc::new(StatusManager::new());
//! let reporter = StatusReporter::new("file", manager.clone());
//!
//! reporter.warn("Could not resolve charset, using default");
//! assert_eq!(manager.count(Level::Warn), 1);
//! ```
//!
//! ## Key Types
//!
//! - [`Status`] - A single leveled report
//! - [`StatusSink`] - Destination for status reports
//! - [`StatusManager`] - In-memory sink that also mirrors reports to `tracing`
//! - [`StatusReporter`] - Per-component handle used to emit reports

#![deny(missing_docs)]

/// Status manager and sink trait.
pub mod manager;
/// Per-component status reporter.
pub mod reporter;
/// Status and level types.
pub mod status;

pub use manager::{StatusManager, StatusSink};
pub use reporter::StatusReporter;
pub use status::{Cause, Level, Status};
