//! Backtest command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;
use trading_backtest::{BacktestEngine, BacktestResult};
use trading_config::AppConfig;
use trading_strategies::{StrategyParams, StrategyRegistry};

use super::{apply_risk_overrides, load_series};
use crate::cli::{BacktestArgs, OutputFormat};

pub async fn run(args: BacktestArgs, app: &AppConfig) -> Result<()> {
    let mut config = app.backtest.clone();
    config.strategy = select_strategy(
        args.strategy.as_deref(),
        args.strategy_config.as_deref(),
        &config.strategy,
    )?;
    apply_risk_overrides(&mut config, &args.risk);
    if args.data.timeframe.is_some() {
        config.timeframe = args.data.timeframe;
    }

    let engine = BacktestEngine::new(config).context("Invalid backtest configuration")?;
    let series = load_series(&args.data, app).await?;

    info!(strategy = engine.config().strategy.key(), "Running backtest");
    let result = engine.run(&series).context("Backtest failed")?;

    match args.output {
        OutputFormat::Json => println!("{}", result.to_json()?),
        OutputFormat::Text => println!("{}", result.summary()),
    }

    save_outputs(&result, &args)?;
    Ok(())
}

/// Resolve `--strategy` / `--strategy-config` against the configured default.
fn select_strategy(
    name: Option<&str>,
    params_json: Option<&str>,
    configured: &StrategyParams,
) -> Result<StrategyParams> {
    let registry = StrategyRegistry::new();

    let params = match params_json {
        Some(text) => serde_json::from_str(text).context("--strategy-config is not valid JSON")?,
        None => serde_json::Value::Null,
    };

    match name {
        Some(name) => registry
            .create(name, params)
            .with_context(|| format!("Failed to create strategy '{}'", name)),
        None if params.is_null() => Ok(configured.clone()),
        None => registry
            .create(configured.key(), params)
            .context("Failed to apply --strategy-config"),
    }
}

fn save_outputs(result: &BacktestResult, args: &BacktestArgs) -> Result<()> {
    if let Some(path) = &args.save {
        write(path, &result.to_json()?)?;
    }
    if let Some(path) = &args.trades_csv {
        write(path, &result.trades_to_csv()?)?;
    }
    if let Some(path) = &args.equity_csv {
        write(path, &result.equity_to_csv()?)?;
    }
    Ok(())
}

fn write(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Saved {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trading_strategies::MACrossoverConfig;

    #[test]
    fn test_select_strategy_defaults_to_configured() {
        let configured = StrategyParams::MaCrossover(MACrossoverConfig {
            fast_period: 5,
            slow_period: 20,
        });
        assert_eq!(select_strategy(None, None, &configured).unwrap(), configured);
    }

    #[test]
    fn test_select_strategy_by_name_with_overrides() {
        let params = select_strategy(Some("rsi"), Some(r#"{"period": 7}"#), &StrategyParams::default())
            .unwrap();
        match params {
            StrategyParams::Rsi(rsi) => assert_eq!(rsi.period, 7),
            other => panic!("unexpected strategy {:?}", other),
        }
    }

    #[test]
    fn test_select_strategy_overrides_configured_kind() {
        let params = select_strategy(None, Some(r#"{"slow_period": 50}"#), &StrategyParams::default())
            .unwrap();
        assert_eq!(
            params,
            StrategyParams::MaCrossover(MACrossoverConfig {
                fast_period: 10,
                slow_period: 50,
            })
        );
    }

    #[test]
    fn test_select_strategy_errors() {
        assert!(select_strategy(Some("turtle"), None, &StrategyParams::default()).is_err());
        assert!(select_strategy(Some("rsi"), Some("{oops"), &StrategyParams::default()).is_err());
    }
}
