use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use jupiter_routeviz::application::{Cli, CommandExecutor};
use jupiter_routeviz::shared::config::ConfigLoader;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::load_config(cli.config.as_deref()).context("load configuration")?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let executor = CommandExecutor::new(config).context("initialize clients")?;
    executor.execute(cli.command).await?;

    Ok(())
}
