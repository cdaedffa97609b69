//! Closed set of strategy variants and their dispatch.

use crate::{
    BollingerConfig, BollingerStrategy, MACrossoverConfig, MACrossoverStrategy, MacdConfig,
    MacdStrategy, RsiConfig, RsiStrategy,
};
use serde::{Deserialize, Serialize};
use trading_core::{
    error::StrategyError,
    traits::{SignalRule, StrategyConfig},
    types::IndicatorSeries,
};

/// Strategy selection plus its parameters.
///
/// Serialized with an internal `kind` tag, e.g.
/// `{"kind": "rsi", "period": 14, "overbought": 70.0, "oversold": 30.0}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyParams {
    MaCrossover(MACrossoverConfig),
    Rsi(RsiConfig),
    Macd(MacdConfig),
    Bollinger(BollingerConfig),
}

impl StrategyParams {
    /// Registry key of the selected strategy.
    pub fn key(&self) -> &'static str {
        match self {
            StrategyParams::MaCrossover(_) => "ma_crossover",
            StrategyParams::Rsi(_) => "rsi",
            StrategyParams::Macd(_) => "macd",
            StrategyParams::Bollinger(_) => "bollinger",
        }
    }
}

impl Default for StrategyParams {
    fn default() -> Self {
        StrategyParams::MaCrossover(MACrossoverConfig::default())
    }
}

impl StrategyConfig for StrategyParams {
    fn validate(&self) -> Result<(), StrategyError> {
        match self {
            StrategyParams::MaCrossover(config) => config.validate(),
            StrategyParams::Rsi(config) => config.validate(),
            StrategyParams::Macd(config) => config.validate(),
            StrategyParams::Bollinger(config) => config.validate(),
        }
    }
}

/// A built strategy with its indicators precomputed over one price series.
#[derive(Debug, Clone)]
pub enum SignalEvaluator {
    MaCrossover(MACrossoverStrategy),
    Rsi(RsiStrategy),
    Macd(MacdStrategy),
    Bollinger(BollingerStrategy),
}

impl SignalEvaluator {
    /// Validate `params` and compute the indicators over `closes`.
    pub fn build(params: &StrategyParams, closes: &[f64]) -> Result<Self, StrategyError> {
        Ok(match params {
            StrategyParams::MaCrossover(config) => {
                SignalEvaluator::MaCrossover(MACrossoverStrategy::new(config.clone(), closes)?)
            }
            StrategyParams::Rsi(config) => {
                SignalEvaluator::Rsi(RsiStrategy::new(config.clone(), closes)?)
            }
            StrategyParams::Macd(config) => {
                SignalEvaluator::Macd(MacdStrategy::new(config.clone(), closes)?)
            }
            StrategyParams::Bollinger(config) => {
                SignalEvaluator::Bollinger(BollingerStrategy::new(config.clone(), closes)?)
            }
        })
    }

    fn rule(&self) -> &dyn SignalRule {
        match self {
            SignalEvaluator::MaCrossover(s) => s,
            SignalEvaluator::Rsi(s) => s,
            SignalEvaluator::Macd(s) => s,
            SignalEvaluator::Bollinger(s) => s,
        }
    }
}

impl SignalRule for SignalEvaluator {
    fn name(&self) -> &str {
        self.rule().name()
    }

    fn should_buy(&self, t: usize) -> bool {
        self.rule().should_buy(t)
    }

    fn should_sell(&self, t: usize) -> bool {
        self.rule().should_sell(t)
    }

    fn warmup_period(&self) -> usize {
        self.rule().warmup_period()
    }

    fn indicators(&self) -> Vec<(&'static str, &IndicatorSeries)> {
        self.rule().indicators()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_tagged_serialization() {
        let params = StrategyParams::Rsi(RsiConfig::default());
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["kind"], "rsi");
        assert_eq!(json["period"], 14);

        let parsed: StrategyParams =
            serde_json::from_str(r#"{"kind": "bollinger", "period": 10}"#).unwrap();
        assert_eq!(
            parsed,
            StrategyParams::Bollinger(BollingerConfig {
                period: 10,
                std_dev: 2.0
            })
        );
    }

    #[test]
    fn test_build_dispatches_by_variant() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let cases = [
            (StrategyParams::MaCrossover(MACrossoverConfig::default()), "MA Crossover", 29),
            (StrategyParams::Rsi(RsiConfig::default()), "RSI", 14),
            (StrategyParams::Macd(MacdConfig::default()), "MACD", 0),
            (StrategyParams::Bollinger(BollingerConfig::default()), "Bollinger Bands", 19),
        ];

        for (params, name, warmup) in cases {
            let evaluator = SignalEvaluator::build(&params, &closes).unwrap();
            assert_eq!(evaluator.name(), name);
            assert_eq!(evaluator.warmup_period(), warmup);
            assert!(!evaluator.indicators().is_empty());
            for (_, series) in evaluator.indicators() {
                assert_eq!(series.len(), closes.len());
            }
        }
    }

    #[test]
    fn test_build_rejects_invalid_params() {
        let params = StrategyParams::Rsi(RsiConfig {
            oversold: 80.0,
            overbought: 20.0,
            ..Default::default()
        });
        assert!(matches!(
            SignalEvaluator::build(&params, &[1.0, 2.0]),
            Err(StrategyError::InvalidConfig(_))
        ));
    }
}
