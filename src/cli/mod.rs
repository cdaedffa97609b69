//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;
use trading_core::types::Timeframe;

#[derive(Parser)]
#[command(name = "backtester")]
#[command(author, version, about = "Bar-by-bar backtester for technical trading strategies")]
pub struct Cli {
    /// Configuration file path (defaults to config/default.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level; overrides the configuration file
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one strategy over a CSV file
    Backtest(BacktestArgs),
    /// Run every registered strategy with defaults and compare them
    Compare(CompareArgs),
    /// List available strategies
    Strategies,
    /// Validate and print the effective configuration
    ValidateConfig,
}

/// Where the bars come from.
#[derive(clap::Args, Debug, Clone)]
pub struct DataArgs {
    /// Data file (CSV)
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Symbol label for the data (defaults to the file name)
    #[arg(short = 'S', long)]
    pub symbol: Option<String>,

    /// First bar to include (YYYY-MM-DD or any supported timestamp)
    #[arg(long)]
    pub start: Option<String>,

    /// Last bar to include, inclusive
    #[arg(long)]
    pub end: Option<String>,

    /// Bar timeframe (1m, 5m, 15m, 30m, 1h, 1d, 1w, 1M)
    #[arg(short, long)]
    pub timeframe: Option<Timeframe>,
}

/// Money and risk overrides.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct RiskArgs {
    /// Initial capital
    #[arg(long)]
    pub capital: Option<Decimal>,

    /// Commission rate per fill (0.002 = 0.2%)
    #[arg(long)]
    pub commission: Option<Decimal>,

    /// Stop loss in percent below entry (0 disables)
    #[arg(long)]
    pub stop_loss: Option<Decimal>,

    /// Take profit in percent above entry (0 disables)
    #[arg(long)]
    pub take_profit: Option<Decimal>,

    /// Percent of cash committed per entry
    #[arg(long)]
    pub position_size: Option<Decimal>,
}

#[derive(clap::Args, Debug)]
pub struct BacktestArgs {
    /// Strategy to backtest (see `strategies`)
    #[arg(short, long)]
    pub strategy: Option<String>,

    /// Strategy parameters as JSON, e.g. '{"fast_period": 5}'
    #[arg(long)]
    pub strategy_config: Option<String>,

    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub risk: RiskArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Save the full result as JSON
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Write the trade log as CSV
    #[arg(long)]
    pub trades_csv: Option<PathBuf>,

    /// Write the equity curve as CSV
    #[arg(long)]
    pub equity_csv: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct CompareArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub risk: RiskArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}
