use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rtwqms-processor")]
#[command(about = "Streaming HMPI processor for water-quality sample data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Settings file [default: rtwqms.toml if present]"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Snapshot store directory (overrides settings)")]
    pub store_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score, aggregate and persist a CSV of water samples
    Process {
        #[arg(short, long, help = "Input CSV file with a header row")]
        input_file: PathBuf,

        #[arg(long, help = "Rows per chunk (overrides settings)")]
        chunk_size: Option<usize>,

        #[arg(short, long, default_value = "false", help = "Hide the live preview")]
        quiet: bool,
    },

    /// List persisted alerts, newest first
    Alerts {
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Clear all persisted alerts
    ResetAlerts,

    /// Print the summary of the last persisted run
    Summary,
}
