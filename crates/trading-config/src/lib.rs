//! Configuration management.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `BACKTESTER_*` environment variables (`__` separates nested keys, e.g.
//! `BACKTESTER_BACKTEST__RISK__COMMISSION_RATE=0.001`).

mod settings;

pub use settings::{AppConfig, AppSettings, DataSettings, LoggingConfig};

use config::{Config, Environment, File};
use std::path::Path;
use tracing::debug;
use trading_core::error::TradingError;

const ENV_PREFIX: &str = "BACKTESTER";

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Load configuration from an optional file and the environment.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, TradingError> {
    load_with_env(path, environment())
}

fn load_with_env(path: Option<&Path>, env: Environment) -> Result<AppConfig, TradingError> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        debug!(path = %path.display(), "Reading configuration file");
        builder = builder.add_source(File::from(path).required(true));
    }

    let config: AppConfig = builder
        .add_source(env)
        .build()
        .and_then(|c| c.try_deserialize())
        .map_err(|e| TradingError::Config(e.to_string()))?;

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use trading_strategies::StrategyParams;

    fn no_env() -> Environment {
        environment().source(Some(config::Map::new()))
    }

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "trading-config-{}-{}.toml",
            std::process::id(),
            name
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults_without_file() {
        let config = load_with_env(None, no_env()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = write_temp(
            "file",
            r#"
[logging]
level = "debug"

[backtest]
initial_cash = 50000

[backtest.strategy]
kind = "rsi"
period = 10

[backtest.risk]
stop_loss_pct = 5
"#,
        );
        let config = load_with_env(Some(&path), no_env()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.backtest.initial_cash, dec!(50000));
        assert_eq!(config.backtest.risk.stop_loss_pct, dec!(5));
        assert_eq!(config.backtest.risk.position_size_pct, dec!(100));
        match config.backtest.strategy {
            StrategyParams::Rsi(rsi) => {
                assert_eq!(rsi.period, 10);
                assert!((rsi.overbought - 70.0).abs() < 1e-10);
            }
            other => panic!("unexpected strategy {:?}", other),
        }
    }

    #[test]
    fn test_environment_overrides_file() {
        let path = write_temp("env", "[logging]\nlevel = \"debug\"\n");
        let mut vars = config::Map::new();
        vars.insert("BACKTESTER_LOGGING__LEVEL".to_string(), "warn".to_string());
        vars.insert("BACKTESTER_LOGGING__JSON".to_string(), "true".to_string());

        let config = load_with_env(Some(&path), environment().source(Some(vars))).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.logging.level, "warn");
        assert!(config.logging.json);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = load_with_env(Some(Path::new("/no/such/config.toml")), no_env()).unwrap_err();
        assert!(matches!(err, TradingError::Config(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let path = write_temp("invalid", "[backtest.risk]\ncommission_rate = -1\n");
        let err = load_with_env(Some(&path), no_env()).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, TradingError::Backtest(_)));
    }
}
