use filesink_appender::AppenderError;
use thiserror::Error;

/// CLI error types.
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ReadConfig {
        /// Path of the configuration file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Configuration file could not be parsed.
    #[error("invalid config: {0}")]
    Config(#[from] AppenderError),
    /// Unrecognised level name.
    #[error("invalid level: {0}")]
    InvalidLevel(String),
    /// The appender did not reach the started state.
    #[error("appender [{0}] did not start")]
    NotStarted(String),
    /// The appender stopped after an I/O failure.
    #[error("appender [{0}] stopped after an I/O failure")]
    Failed(String),
}
