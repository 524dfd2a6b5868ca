use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "runmark",
    about = "GitHub Actions log annotations for build job lifecycle events",
    version,
    after_help = "Logs are written to: ~/.local/share/runmark/logs/runmark.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to runmark.yaml config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, help = "Suppress non-error logging")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Annotate a stream of job lifecycle events
    Annotate {
        /// Read events from this file instead of stdin (one JSON object per line)
        #[arg(long)]
        events: Option<PathBuf>,
    },

    /// List registered event handlers
    Handlers,
}
