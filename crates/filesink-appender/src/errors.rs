use thiserror::Error;

/// Errors that can occur inside the appender.
///
/// None of these escape [`FileAppender::append`](crate::FileAppender::append);
/// they are attached as the cause of a status report instead.
#[derive(Error, Debug)]
pub enum AppenderError {
    /// I/O error during open, write, flush, lock or close.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Write attempted after the channel was closed.
    #[error("output channel is closed")]
    ChannelClosed,
    /// Encoding name not recognised.
    #[error("unknown charset \"{0}\"")]
    UnknownCharset(String),
    /// Configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
