//! CLI command implementations.

pub mod backtest;
pub mod compare;
pub mod strategies;
pub mod validate;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::info;
use trading_backtest::BacktestConfig;
use trading_config::AppConfig;
use trading_core::types::{BarSeries, Timeframe};
use trading_data::{load_csv, parse_timestamp};

use crate::cli::{DataArgs, RiskArgs};

/// Load the series selected by the data flags, falling back to `[data]`.
pub(crate) async fn load_series(args: &DataArgs, config: &AppConfig) -> Result<BarSeries> {
    let path = args
        .data
        .clone()
        .or_else(|| config.data.path.as_ref().map(PathBuf::from))
        .context("No data file given; pass --data <csv> or set data.path")?;

    let symbol = args
        .symbol
        .clone()
        .or_else(|| config.data.symbol.clone())
        .unwrap_or_else(|| symbol_from_path(&path));
    let timeframe = args
        .timeframe
        .or(config.backtest.timeframe)
        .unwrap_or(Timeframe::Daily);
    let start = parse_bound(args.start.as_deref()).context("Invalid --start")?;
    let end = parse_bound(args.end.as_deref()).context("Invalid --end")?;

    let series = load_csv(&path, &symbol, timeframe, start, end)
        .await
        .with_context(|| format!("Failed to load data from {}", path.display()))?;

    info!(symbol = %series.symbol, bars = series.len(), %timeframe, "Data ready");
    Ok(series)
}

/// Apply CLI money and risk flags on top of the configured defaults.
pub(crate) fn apply_risk_overrides(config: &mut BacktestConfig, args: &RiskArgs) {
    if let Some(capital) = args.capital {
        config.initial_cash = capital;
    }
    if let Some(rate) = args.commission {
        config.risk.commission_rate = rate;
    }
    if let Some(pct) = args.stop_loss {
        config.risk.stop_loss_pct = pct;
    }
    if let Some(pct) = args.take_profit {
        config.risk.take_profit_pct = pct;
    }
    if let Some(pct) = args.position_size {
        config.risk.position_size_pct = pct;
    }
}

fn parse_bound(value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    value
        .map(|s| {
            let ms = parse_timestamp(s)?;
            DateTime::from_timestamp_millis(ms).ok_or_else(|| anyhow!("date out of range: {}", s))
        })
        .transpose()
}

fn symbol_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_uppercase())
        .unwrap_or_else(|| "DATA".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_risk_overrides_only_touch_given_fields() {
        let mut config = BacktestConfig::default();
        let args = RiskArgs {
            capital: Some(dec!(5000)),
            stop_loss: Some(dec!(3)),
            ..Default::default()
        };
        apply_risk_overrides(&mut config, &args);

        assert_eq!(config.initial_cash, dec!(5000));
        assert_eq!(config.risk.stop_loss_pct, dec!(3));
        assert_eq!(config.risk.commission_rate, dec!(0.002));
        assert_eq!(config.risk.position_size_pct, dec!(100));
    }

    #[test]
    fn test_parse_bound() {
        assert_eq!(parse_bound(None).unwrap(), None);
        let day = parse_bound(Some("1970-01-02")).unwrap().unwrap();
        assert_eq!(day.timestamp_millis(), 86_400_000);
        assert!(parse_bound(Some("someday")).is_err());
    }

    #[test]
    fn test_symbol_from_path() {
        assert_eq!(symbol_from_path(Path::new("data/spy_daily.csv")), "SPY_DAILY");
    }
}
