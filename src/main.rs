use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mailvane::cli::{commands, Cli, Commands};
use mailvane::config::Config;
use mailvane::poller::PollerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Poll => {
            let ctx = commands::build_context(&config)?;
            commands::poll_once(&ctx).await?;
        }
        Commands::Run { interval } => {
            let min_interval_secs = match interval {
                Some(s) => PollerConfig::parse_interval(&s).map_err(anyhow::Error::msg)?,
                None => config.feed.poll_interval_secs,
            };
            let ctx = commands::build_context(&config)?;
            commands::run_loop(ctx, min_interval_secs).await?;
        }
        Commands::Status => {
            commands::show_status(&config)?;
        }
    }

    Ok(())
}
