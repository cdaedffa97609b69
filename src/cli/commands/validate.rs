//! Validate configuration command.

use anyhow::Result;
use std::path::Path;
use trading_config::AppConfig;

/// `load_config` already validated `config`; show what will be used.
pub fn run(config: &AppConfig, source: Option<&Path>) -> Result<()> {
    match source {
        Some(path) => println!("Configuration is valid: {}", path.display()),
        None => println!("Configuration is valid (built-in defaults and environment)"),
    }
    println!();
    print!("{}", config.to_toml()?);
    Ok(())
}
