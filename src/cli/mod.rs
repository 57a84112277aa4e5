pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mailvane")]
#[command(about = "A webmail unread-feed watcher", long_about = None)]
pub struct Cli {
    /// Path to an alternate config file
    #[arg(short, long, global = true)]
    pub config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one poll cycle now and print the summary
    Poll,
    /// Run the polling loop in the foreground
    Run {
        /// Minimum interval between polls (e.g., "90s", "3m", "1h")
        #[arg(short, long)]
        interval: Option<String>,
    },
    /// Print the last persisted unread count and headers
    Status,
}
