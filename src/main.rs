//! Backtester CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};
use trading_config::load_config;
use trading_monitor::setup_logging;

const DEFAULT_CONFIG: &str = "config/default.toml";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // An explicit --config must exist; the default file is optional.
    let config_path: Option<PathBuf> = cli
        .config
        .clone()
        .or_else(|| Path::new(DEFAULT_CONFIG).is_file().then(|| PathBuf::from(DEFAULT_CONFIG)));
    let config = load_config(config_path.as_deref()).context("Failed to load configuration")?;

    let level = cli
        .log_level
        .map(|l| l.as_str().to_string())
        .unwrap_or_else(|| config.logging.level.clone());
    setup_logging(&level, cli.json_logs || config.logging.json)
        .context("Failed to initialise logging")?;

    match cli.command {
        Commands::Backtest(args) => cli::commands::backtest::run(args, &config).await,
        Commands::Compare(args) => cli::commands::compare::run(args, &config).await,
        Commands::Strategies => cli::commands::strategies::run(),
        Commands::ValidateConfig => cli::commands::validate::run(&config, config_path.as_deref()),
    }
}
