//! Backtesting engine.

use rayon::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};
use trading_core::error::BacktestError;
use trading_core::traits::{SignalRule, StrategyConfig};
use trading_core::types::{BarSeries, EquityPoint, ExitReason, Timeframe};
use trading_risk::{price_to_decimal, PositionManager, RiskConfig};
use trading_strategies::{SignalEvaluator, StrategyParams};

use crate::report::BacktestResult;
use crate::statistics::PerformanceAnalyzer;

/// Largest accepted starting capital; keeps every fill and equity value
/// inside the range `Decimal` can represent.
pub const MAX_INITIAL_CASH: Decimal = dec!(1000000000000000);

/// Backtest configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    /// Strategy selection and parameters
    pub strategy: StrategyParams,
    /// Commission, sizing and protective exits
    pub risk: RiskConfig,
    /// Initial capital
    pub initial_cash: Decimal,
    /// Bar spacing used for annualization; defaults to the series' own
    pub timeframe: Option<Timeframe>,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyParams::default(),
            risk: RiskConfig::default(),
            initial_cash: dec!(100000),
            timeframe: None,
        }
    }
}

impl BacktestConfig {
    /// Validate every parameter before any bar is simulated.
    pub fn validate(&self) -> Result<(), BacktestError> {
        if self.initial_cash <= Decimal::ZERO {
            return Err(BacktestError::InvalidParameter(format!(
                "initial_cash must be positive, got {}",
                self.initial_cash
            )));
        }
        if self.initial_cash > MAX_INITIAL_CASH {
            return Err(BacktestError::InvalidParameter(format!(
                "initial_cash must be at most {}, got {}",
                MAX_INITIAL_CASH, self.initial_cash
            )));
        }
        self.risk.validate()?;
        self.strategy.validate()?;
        Ok(())
    }
}

/// Backtesting engine bound to one validated configuration.
#[derive(Debug, Clone)]
pub struct BacktestEngine {
    config: BacktestConfig,
}

impl BacktestEngine {
    /// Create a new backtest engine, rejecting out-of-range parameters.
    pub fn new(config: BacktestConfig) -> Result<Self, BacktestError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// Run a backtest over `series`.
    ///
    /// Decisions at bar `t` only read data up to and including `t`. Fills
    /// happen at the bar close, or at the stop/target level when the bar's
    /// range reaches it.
    pub fn run(&self, series: &BarSeries) -> Result<BacktestResult, BacktestError> {
        let bars = series.bars();
        let (Some(first_bar), Some(last_bar)) = (bars.first(), bars.last()) else {
            return Err(BacktestError::EmptyData);
        };

        let closes = series.closes();
        let evaluator = SignalEvaluator::build(&self.config.strategy, &closes)?;

        let warmup = evaluator.warmup_period();
        let required = warmup + 1;
        if bars.len() < required {
            return Err(BacktestError::InsufficientData {
                required,
                available: bars.len(),
            });
        }

        info!(
            symbol = %series.symbol,
            strategy = evaluator.name(),
            bars = bars.len(),
            warmup,
            "Starting backtest"
        );

        let mut manager = PositionManager::new(self.config.initial_cash, &self.config.risk);
        let mut trades = Vec::new();
        let mut equity_curve = Vec::with_capacity(bars.len() - warmup);
        let last = bars.len() - 1;

        for (t, bar) in bars.iter().enumerate().skip(warmup) {
            if !manager.is_flat() {
                let exit = manager
                    .check_exit_triggers(bar)
                    .or_else(|| {
                        evaluator
                            .should_sell(t)
                            .then(|| (ExitReason::Signal, price_to_decimal(bar.close)))
                    })
                    .or_else(|| {
                        (t == last).then(|| (ExitReason::EndOfData, price_to_decimal(bar.close)))
                    });

                if let Some((reason, price)) = exit {
                    trades.extend(manager.exit(t, bar.timestamp, price, reason));
                }
            }

            if manager.is_flat() && t < last && evaluator.should_buy(t) {
                manager.try_enter(t, bar);
            }

            equity_curve.push(EquityPoint::new(
                bar.timestamp,
                manager.equity(bar.close),
                !manager.is_flat(),
            ));
        }

        debug_assert!(manager.is_flat());

        let timeframe = self.config.timeframe.unwrap_or(series.timeframe);
        let stats = PerformanceAnalyzer::new(self.config.initial_cash, timeframe).analyze(
            &equity_curve,
            &trades,
            first_bar.close,
            last_bar.close,
        );

        info!(
            symbol = %series.symbol,
            strategy = evaluator.name(),
            trades = trades.len(),
            return_pct = %stats.return_pct.round_dp(2),
            "Backtest complete"
        );

        let indicators: BTreeMap<String, _> = evaluator
            .indicators()
            .into_iter()
            .map(|(name, values)| (name.to_string(), values.clone()))
            .collect();

        Ok(BacktestResult {
            symbol: series.symbol.clone(),
            strategy: evaluator.name().to_string(),
            config: self.config.clone(),
            stats,
            trades,
            equity_curve,
            indicators,
        })
    }
}

/// Run independent configurations over the same series in parallel.
///
/// Results come back in the order of `configs`; each configuration is
/// validated on its own, so one bad entry does not fail the others.
pub fn run_many(
    series: &BarSeries,
    configs: &[BacktestConfig],
) -> Vec<Result<BacktestResult, BacktestError>> {
    debug!(runs = configs.len(), "Running configurations in parallel");
    configs
        .par_iter()
        .map(|config| BacktestEngine::new(config.clone())?.run(series))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use trading_core::types::Bar;
    use trading_strategies::{MACrossoverConfig, RsiConfig};

    const DAY_MS: i64 = 86_400_000;

    fn series_from_closes(closes: &[f64]) -> BarSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(i as i64 * DAY_MS, c, c, c, c, 1000.0))
            .collect();
        BarSeries::new("TEST", Timeframe::Daily, bars).unwrap()
    }

    fn generate_test_series() -> BarSeries {
        let bars = (0..100)
            .map(|i| {
                let price = 100.0 + (i as f64 * 0.5).sin() * 10.0;
                Bar::new(
                    i as i64 * DAY_MS,
                    price,
                    price + 2.0,
                    price - 2.0,
                    price + 1.0,
                    1_000_000.0,
                )
            })
            .collect();
        BarSeries::new("TEST", Timeframe::Daily, bars).unwrap()
    }

    fn ma_config(fast: usize, slow: usize) -> BacktestConfig {
        BacktestConfig {
            strategy: StrategyParams::MaCrossover(MACrossoverConfig {
                fast_period: fast,
                slow_period: slow,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_backtest_runs() {
        let engine = BacktestEngine::new(ma_config(5, 10)).unwrap();
        let series = generate_test_series();
        let result = engine.run(&series).unwrap();

        assert_eq!(result.equity_curve.len(), 100 - 9);
        assert_eq!(result.stats.bars_simulated, 91);
        assert!(!result.trades.is_empty());
        assert_eq!(result.strategy, "MA Crossover");
        assert!(result.indicators.contains_key("fast_ma"));
    }

    #[test]
    fn test_invalid_config_rejected_up_front() {
        let config = BacktestConfig {
            initial_cash: Decimal::ZERO,
            ..Default::default()
        };
        assert!(matches!(
            BacktestEngine::new(config),
            Err(BacktestError::InvalidParameter(_))
        ));

        let config = BacktestConfig {
            strategy: StrategyParams::Rsi(RsiConfig {
                oversold: 70.0,
                overbought: 30.0,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(matches!(
            BacktestEngine::new(config),
            Err(BacktestError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_oversized_initial_cash_rejected() {
        let config = BacktestConfig {
            initial_cash: Decimal::MAX / dec!(10),
            ..ma_config(2, 3)
        };
        assert!(matches!(
            BacktestEngine::new(config),
            Err(BacktestError::InvalidParameter(_))
        ));

        let config = BacktestConfig {
            initial_cash: MAX_INITIAL_CASH,
            ..ma_config(2, 3)
        };
        let closes: Vec<f64> = (0..12).map(|i| if i % 4 < 2 { 1.0 } else { 1e12 }).collect();
        let result = BacktestEngine::new(config)
            .unwrap()
            .run(&series_from_closes(&closes))
            .unwrap();
        assert!(!result.trades.is_empty());
    }

    #[test]
    fn test_equal_averages_never_cross() {
        // Both averages settle on exactly 10.25; equality is not an up-cross.
        let engine = BacktestEngine::new(ma_config(2, 3)).unwrap();
        let result = engine
            .run(&series_from_closes(&[
                12.3, 11.7, 10.9, 10.3, 10.25, 10.25, 10.25, 10.25, 10.25, 10.25,
            ]))
            .unwrap();

        assert!(result.trades.is_empty());
        let fast = &result.indicators["fast_ma"];
        let slow = &result.indicators["slow_ma"];
        for t in 6..10 {
            assert_eq!(fast.get(t), Some(10.25));
            assert_eq!(slow.get(t), Some(10.25));
        }
    }

    #[test]
    fn test_empty_series() {
        let engine = BacktestEngine::new(BacktestConfig::default()).unwrap();
        let series = BarSeries::new("EMPTY", Timeframe::Daily, vec![]).unwrap();
        assert_eq!(engine.run(&series).unwrap_err(), BacktestError::EmptyData);
    }

    #[test]
    fn test_insufficient_data_names_minimum() {
        let engine = BacktestEngine::new(BacktestConfig::default()).unwrap();
        let series = series_from_closes(&[100.0; 12]);
        assert_eq!(
            engine.run(&series).unwrap_err(),
            BacktestError::InsufficientData {
                required: 30,
                available: 12
            }
        );
    }

    #[test]
    fn test_exactly_required_bars_runs() {
        let engine = BacktestEngine::new(ma_config(2, 3)).unwrap();
        let result = engine.run(&series_from_closes(&[1.0, 2.0, 3.0])).unwrap();
        assert_eq!(result.equity_curve.len(), 1);
        assert!(result.trades.is_empty());
    }

    #[test]
    fn test_no_entry_on_final_bar() {
        // The only up-cross happens on the last bar.
        let engine = BacktestEngine::new(ma_config(2, 3)).unwrap();
        let result = engine
            .run(&series_from_closes(&[5.0, 4.0, 3.0, 4.0, 7.0]))
            .unwrap();
        assert!(result.trades.is_empty());
        assert_eq!(result.stats.final_equity, dec!(100000));
    }

    #[test]
    fn test_run_many_preserves_order() {
        let series = generate_test_series();
        let configs = vec![
            ma_config(5, 10),
            BacktestConfig {
                initial_cash: dec!(-1),
                ..Default::default()
            },
            ma_config(3, 20),
        ];

        let results = run_many(&series, &configs);
        assert_eq!(results.len(), 3);
        assert!(results[1].is_err());

        let sequential = BacktestEngine::new(ma_config(3, 20))
            .unwrap()
            .run(&series)
            .unwrap();
        assert_eq!(results[2].as_ref().unwrap().trades, sequential.trades);
        assert_eq!(
            results[0].as_ref().unwrap().config,
            ma_config(5, 10)
        );
    }
}
