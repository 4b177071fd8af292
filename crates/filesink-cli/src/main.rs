//! filesink CLI - append records to log files and inspect effective settings.

use clap::{Parser, Subcommand};

mod commands;
mod error;
mod output;

use commands::{append, check, SinkArgs};

#[derive(Parser)]
#[command(name = "filesink")]
#[command(about = "Append log records to a file, optionally shared between processes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append records to a log file
    Append {
        #[command(flatten)]
        sink: SinkArgs,
        /// Messages to append (read lines from stdin if none are given)
        messages: Vec<String>,
        /// Appender name used in status reports
        #[arg(long, default_value = "cli")]
        name: String,
        /// Severity of the records (trace, debug, info, warn, error)
        #[arg(long, default_value = "info")]
        level: String,
        /// Target shown in each record
        #[arg(long, default_value = "filesink")]
        target: String,
        /// Write only the message, without timestamp, level and target
        #[arg(long)]
        raw: bool,
        /// Text written when the file is opened
        #[arg(long)]
        header: Option<String>,
        /// Text written when the file is closed
        #[arg(long)]
        footer: Option<String>,
        /// Append every message N times
        #[arg(long, default_value_t = 1)]
        repeat: u64,
        /// Print collected status reports as JSON lines on stdout
        #[arg(long)]
        status_json: bool,
    },
    /// Show the settings that would be in effect, without opening the file
    Check {
        #[command(flatten)]
        sink: SinkArgs,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Append {
            sink,
            messages,
            name,
            level,
            target,
            raw,
            header,
            footer,
            repeat,
            status_json,
        } => append::run(append::AppendOptions {
            sink,
            messages,
            name,
            level,
            target,
            raw,
            header,
            footer,
            repeat,
            status_json,
        }),
        Commands::Check { sink } => check::run(sink),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
