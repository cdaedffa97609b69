//! Moving Average Crossover Strategy.
//!
//! Generates buy signals when the fast SMA crosses above the slow SMA,
//! and sell signals when the slow SMA crosses above the fast SMA.

use serde::{Deserialize, Serialize};
use tracing::warn;
use trading_core::traits::Indicator;
use trading_core::{
    error::StrategyError,
    traits::{crosses_above, SignalRule, StrategyConfig},
    types::IndicatorSeries,
};
use trading_indicators::Sma;

/// Configuration for the MA Crossover strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MACrossoverConfig {
    /// Fast moving average period
    pub fast_period: usize,
    /// Slow moving average period
    pub slow_period: usize,
}

impl Default for MACrossoverConfig {
    fn default() -> Self {
        Self {
            fast_period: 10,
            slow_period: 30,
        }
    }
}

impl StrategyConfig for MACrossoverConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.fast_period == 0 || self.slow_period == 0 {
            return Err(StrategyError::InvalidConfig(
                "Moving average periods must be greater than 0".into(),
            ));
        }
        if self.fast_period >= self.slow_period {
            // Legal, but the "fast" line is then the slower one.
            warn!(
                fast = self.fast_period,
                slow = self.slow_period,
                "Fast period is not shorter than slow period"
            );
        }
        Ok(())
    }
}

/// Moving Average Crossover Strategy over precomputed SMAs.
#[derive(Debug, Clone)]
pub struct MACrossoverStrategy {
    config: MACrossoverConfig,
    fast: IndicatorSeries,
    slow: IndicatorSeries,
}

impl MACrossoverStrategy {
    /// Build the strategy and compute both moving averages over `closes`.
    pub fn new(config: MACrossoverConfig, closes: &[f64]) -> Result<Self, StrategyError> {
        config.validate()?;
        let fast = Sma::new(config.fast_period)?.calculate(closes);
        let slow = Sma::new(config.slow_period)?.calculate(closes);
        Ok(Self { config, fast, slow })
    }

    pub fn config(&self) -> &MACrossoverConfig {
        &self.config
    }
}

impl SignalRule for MACrossoverStrategy {
    fn name(&self) -> &str {
        "MA Crossover"
    }

    fn should_buy(&self, t: usize) -> bool {
        crosses_above(&self.fast, &self.slow, t)
    }

    fn should_sell(&self, t: usize) -> bool {
        crosses_above(&self.slow, &self.fast, t)
    }

    fn warmup_period(&self) -> usize {
        self.config.fast_period.max(self.config.slow_period) - 1
    }

    fn indicators(&self) -> Vec<(&'static str, &IndicatorSeries)> {
        vec![("fast_ma", &self.fast), ("slow_ma", &self.slow)]
    }
}
