//! Subcommand implementations.

pub mod append;
pub mod check;

use crate::error::CliError;
use clap::Args;
use filesink_appender::FileConfig;
use std::path::PathBuf;

/// Destination settings shared by every subcommand.
///
/// Flags override the values read from `--config`.
#[derive(Args, Debug, Clone, Default)]
pub struct SinkArgs {
    /// Destination file
    #[arg(long, short = 'f')]
    pub file: Option<String>,
    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Lock the file on every write so several processes can share it
    #[arg(long)]
    pub prudent: bool,
    /// Buffer output in memory
    #[arg(long)]
    pub buffered: bool,
    /// Buffer capacity in bytes
    #[arg(long)]
    pub buffer_size: Option<usize>,
    /// Do not flush after every record
    #[arg(long)]
    pub no_immediate_flush: bool,
    /// Truncate the file instead of appending
    #[arg(long)]
    pub truncate: bool,
    /// Character encoding of the file
    #[arg(long)]
    pub encoding: Option<String>,
}

impl SinkArgs {
    /// Builds the configured (not yet reconciled) settings.
    pub fn to_config(&self) -> Result<FileConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| CliError::ReadConfig {
                    path: path.display().to_string(),
                    source,
                })?;
                FileConfig::from_json(&json)?
            }
            None => FileConfig::default(),
        };

        if let Some(file) = &self.file {
            config = config.with_file(file);
        }
        if self.prudent {
            config.prudent = true;
        }
        if self.buffered {
            config.buffered_io = true;
        }
        if let Some(size) = self.buffer_size {
            config.buffer_size = size;
        }
        if self.no_immediate_flush {
            config.immediate_flush = false;
        }
        if self.truncate {
            config.append = false;
        }
        if let Some(encoding) = &self.encoding {
            config = config.with_encoding(encoding);
        }
        Ok(config)
    }
}
