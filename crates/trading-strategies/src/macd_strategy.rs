//! MACD Strategy.
//!
//! Buys when the MACD line crosses above its signal line and exits on the
//! opposite cross.

use serde::{Deserialize, Serialize};
use tracing::warn;
use trading_core::traits::MultiOutputIndicator;
use trading_core::{
    error::StrategyError,
    traits::{crosses_above, SignalRule, StrategyConfig},
    types::IndicatorSeries,
};
use trading_indicators::{Macd, MacdOutput};

/// Configuration for the MACD strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdConfig {
    /// Fast EMA span
    pub fast_period: usize,
    /// Slow EMA span
    pub slow_period: usize,
    /// Signal line EMA span
    pub signal_period: usize,
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl StrategyConfig for MacdConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.fast_period == 0 || self.slow_period == 0 || self.signal_period == 0 {
            return Err(StrategyError::InvalidConfig(
                "MACD spans must be greater than 0".into(),
            ));
        }
        if self.fast_period >= self.slow_period {
            warn!(
                fast = self.fast_period,
                slow = self.slow_period,
                "MACD fast span is not shorter than slow span"
            );
        }
        Ok(())
    }
}

/// MACD signal-line crossover strategy.
#[derive(Debug, Clone)]
pub struct MacdStrategy {
    config: MacdConfig,
    output: MacdOutput,
}

impl MacdStrategy {
    /// Build the strategy and compute MACD over `closes`.
    pub fn new(config: MacdConfig, closes: &[f64]) -> Result<Self, StrategyError> {
        config.validate()?;
        let output = Macd::new(config.fast_period, config.slow_period, config.signal_period)?
            .calculate(closes);
        Ok(Self { config, output })
    }

    pub fn config(&self) -> &MacdConfig {
        &self.config
    }
}

impl SignalRule for MacdStrategy {
    fn name(&self) -> &str {
        "MACD"
    }

    fn should_buy(&self, t: usize) -> bool {
        crosses_above(&self.output.macd, &self.output.signal, t)
    }

    fn should_sell(&self, t: usize) -> bool {
        crosses_above(&self.output.signal, &self.output.macd, t)
    }

    fn warmup_period(&self) -> usize {
        0
    }

    fn indicators(&self) -> Vec<(&'static str, &IndicatorSeries)> {
        vec![
            ("macd", &self.output.macd),
            ("signal", &self.output.signal),
            ("histogram", &self.output.histogram),
        ]
    }
}
