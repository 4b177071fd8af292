//! Append-only file sink for formatted log records.
//!
//! This crate provides:
//! - A [`FileAppender`] with an explicit start/stop lifecycle that never lets
//!   I/O failures escape to the caller
//! - Optional in-memory buffering, with the buffered tail flushed on stop
//! - Prudent mode, where several processes can append to one file safely
//!   using advisory locks and end-of-file resynchronization
//! - Charset conversion and header/footer decoration
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use filesink_appender::{FileAppender, FileConfig, LineFormatter, LogEvent};
//! use filesink_status::{Level, StatusManager};
//!
//! let dir = tempfile::tempdir()?;
//! let path = dir.path().join("shared.log");
//! let status = Arc::new(StatusManager::new());
//!
//! let mut appender = FileAppender::new(status.clone())
//!     .with_name("shared")
//!     .with_config(
//!         FileConfig::default()
//!             .with_file(path.to_string_lossy())
//!             .with_prudent(true),
//!     )
//!     .with_formatter(Arc::new(LineFormatter::message_only()));
//!
//! appender.start();
//! appender.append(&LogEvent::new(tracing::Level::INFO, "app", "hello"));
//! appender.stop();
//!
//! assert_eq!(std::fs::read_to_string(&path)?, "hello\n");
//! assert_eq!(status.count(Level::Error), 0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Key Types
//!
//! - [`FileAppender`] - Lifecycle and write serialization
//! - [`FileConfig`] - Destination settings
//! - [`OutputChannel`] - The open destination
//! - [`Formatter`] - Rendering of events and decorations
//! - [`Encoder`] - Text to bytes

#![deny(missing_docs)]

/// File appender lifecycle.
pub mod appender;
/// Output channel owning the destination file.
pub mod channel;
/// Destination settings.
pub mod config;
/// Header and footer emission.
pub mod decorator;
/// Charset resolution and encoding.
pub mod encoder;
/// Error types for appender internals.
pub mod errors;
/// Formatter interface and line formatter.
pub mod formatter;
/// Locked writes for files shared between processes.
pub mod prudent;

pub use appender::{FileAppender, LifecycleState};
pub use channel::{ChannelOptions, OutputChannel};
pub use config::{Adjustment, FileConfig, DEFAULT_BUFFER_SIZE};
pub use decorator::{DecoratedChannel, LINE_SEPARATOR};
pub use encoder::{Charset, Encoder};
pub use errors::AppenderError;
pub use formatter::{Formatter, LineFormatter, LogEvent};
