//! RSI Strategy.
//!
//! Buys when RSI drops below the oversold level and exits when RSI rises
//! above the overbought level.

use serde::{Deserialize, Serialize};
use trading_core::traits::Indicator;
use trading_core::{
    error::StrategyError,
    traits::{SignalRule, StrategyConfig},
    types::IndicatorSeries,
};
use trading_indicators::{Rsi, RsiSmoothing};

/// Configuration for the RSI strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiConfig {
    /// RSI period
    pub period: usize,
    /// Overbought threshold (exit)
    pub overbought: f64,
    /// Oversold threshold (entry)
    pub oversold: f64,
    /// Averaging method for gains and losses
    pub smoothing: RsiSmoothing,
}

impl Default for RsiConfig {
    fn default() -> Self {
        Self {
            period: 14,
            overbought: 70.0,
            oversold: 30.0,
            smoothing: RsiSmoothing::Simple,
        }
    }
}

impl StrategyConfig for RsiConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.period == 0 {
            return Err(StrategyError::InvalidConfig(
                "RSI period must be greater than 0".into(),
            ));
        }
        let in_range = |v: f64| (0.0..=100.0).contains(&v);
        if !in_range(self.oversold) || !in_range(self.overbought) {
            return Err(StrategyError::InvalidConfig(
                "RSI thresholds must be between 0 and 100".into(),
            ));
        }
        if self.oversold >= self.overbought {
            return Err(StrategyError::InvalidConfig(format!(
                "Oversold ({}) must be below overbought ({})",
                self.oversold, self.overbought
            )));
        }
        Ok(())
    }
}

/// RSI threshold strategy over a precomputed RSI series.
#[derive(Debug, Clone)]
pub struct RsiStrategy {
    config: RsiConfig,
    rsi: IndicatorSeries,
}

impl RsiStrategy {
    /// Build the strategy and compute RSI over `closes`.
    pub fn new(config: RsiConfig, closes: &[f64]) -> Result<Self, StrategyError> {
        config.validate()?;
        let rsi = Rsi::with_smoothing(config.period, config.smoothing)?.calculate(closes);
        Ok(Self { config, rsi })
    }

    pub fn config(&self) -> &RsiConfig {
        &self.config
    }
}

impl SignalRule for RsiStrategy {
    fn name(&self) -> &str {
        "RSI"
    }

    fn should_buy(&self, t: usize) -> bool {
        self.rsi.get(t).is_some_and(|rsi| rsi < self.config.oversold)
    }

    fn should_sell(&self, t: usize) -> bool {
        self.rsi.get(t).is_some_and(|rsi| rsi > self.config.overbought)
    }

    fn warmup_period(&self) -> usize {
        self.config.period
    }

    fn indicators(&self) -> Vec<(&'static str, &IndicatorSeries)> {
        vec![("rsi", &self.rsi)]
    }
}
