//! Append command implementation.

use super::SinkArgs;
use crate::error::CliError;
use crate::output;
use filesink_appender::{FileAppender, LineFormatter, LogEvent};
use filesink_status::{Level, StatusManager};
use std::io::BufRead;
use std::sync::Arc;

/// Arguments of the `append` subcommand.
pub struct AppendOptions {
    pub sink: SinkArgs,
    pub messages: Vec<String>,
    pub name: String,
    pub level: String,
    pub target: String,
    pub raw: bool,
    pub header: Option<String>,
    pub footer: Option<String>,
    pub repeat: u64,
    pub status_json: bool,
}

pub fn run(options: AppendOptions) -> Result<(), Box<dyn std::error::Error>> {
    let config = options.sink.to_config()?;
    let level = parse_level(&options.level)?;

    let mut formatter = if options.raw {
        LineFormatter::message_only()
    } else {
        LineFormatter::new()
    };
    if let Some(header) = &options.header {
        formatter = formatter.with_file_header(header);
    }
    if let Some(footer) = &options.footer {
        formatter = formatter.with_file_footer(footer);
    }

    let status = Arc::new(StatusManager::new());
    let mut appender = FileAppender::new(status.clone())
        .with_name(&options.name)
        .with_config(config)
        .with_formatter(Arc::new(formatter));
    appender.start();

    let outcome = if appender.is_started() {
        write_all(&appender, &options, level)?;
        appender.stop();
        if status.count(Level::Error) > 0 {
            Err(CliError::Failed(options.name.clone()))
        } else {
            Ok(())
        }
    } else {
        Err(CliError::NotStarted(options.name.clone()))
    };

    if options.status_json {
        for report in status.statuses() {
            println!("{}", serde_json::to_string(&output::status_json(&report))?);
        }
    }

    outcome.map_err(Into::into)
}

fn write_all(
    appender: &FileAppender<LogEvent>,
    options: &AppendOptions,
    level: tracing::Level,
) -> Result<(), Box<dyn std::error::Error>> {
    let emit = |message: &str| {
        for _ in 0..options.repeat {
            appender.append(&LogEvent::new(level, &options.target, message));
        }
    };

    if options.messages.is_empty() {
        for line in std::io::stdin().lock().lines() {
            emit(&line?);
        }
    } else {
        for message in &options.messages {
            emit(message);
        }
    }
    Ok(())
}

fn parse_level(level: &str) -> Result<tracing::Level, CliError> {
    level
        .parse()
        .map_err(|_| CliError::InvalidLevel(level.to_string()))
}
