//! Bollinger Bands Strategy.
//!
//! Enters when the close falls below the lower band and exits when the
//! close rises above the upper band.

use serde::{Deserialize, Serialize};
use trading_core::traits::MultiOutputIndicator;
use trading_core::{
    error::StrategyError,
    traits::{SignalRule, StrategyConfig},
    types::IndicatorSeries,
};
use trading_indicators::{BollingerBands, BollingerOutput};

/// Configuration for the Bollinger Bands strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BollingerConfig {
    /// Lookback period for the middle band and standard deviation
    pub period: usize,
    /// Band width in standard deviations
    pub std_dev: f64,
}

impl Default for BollingerConfig {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev: 2.0,
        }
    }
}

impl StrategyConfig for BollingerConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.period < 2 {
            return Err(StrategyError::InvalidConfig(
                "Bollinger period must be at least 2".into(),
            ));
        }
        if !(self.std_dev.is_finite() && self.std_dev > 0.0) {
            return Err(StrategyError::InvalidConfig(
                "Bollinger std_dev must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Band-touch strategy over precomputed Bollinger Bands.
#[derive(Debug, Clone)]
pub struct BollingerStrategy {
    config: BollingerConfig,
    closes: Vec<f64>,
    bands: BollingerOutput,
}

impl BollingerStrategy {
    /// Build the strategy and compute the bands over `closes`.
    pub fn new(config: BollingerConfig, closes: &[f64]) -> Result<Self, StrategyError> {
        config.validate()?;
        let bands = BollingerBands::new(config.period, config.std_dev)?.calculate(closes);
        Ok(Self {
            config,
            closes: closes.to_vec(),
            bands,
        })
    }

    pub fn config(&self) -> &BollingerConfig {
        &self.config
    }
}

impl SignalRule for BollingerStrategy {
    fn name(&self) -> &str {
        "Bollinger Bands"
    }

    fn should_buy(&self, t: usize) -> bool {
        self.closes
            .get(t)
            .is_some_and(|&close| self.bands.is_below_lower(t, close))
    }

    fn should_sell(&self, t: usize) -> bool {
        self.closes
            .get(t)
            .is_some_and(|&close| self.bands.is_above_upper(t, close))
    }

    fn warmup_period(&self) -> usize {
        self.config.period - 1
    }

    fn indicators(&self) -> Vec<(&'static str, &IndicatorSeries)> {
        vec![
            ("upper_band", &self.bands.upper),
            ("middle_band", &self.bands.middle),
            ("lower_band", &self.bands.lower),
        ]
    }
}
