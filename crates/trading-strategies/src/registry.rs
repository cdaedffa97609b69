//! Strategy registry for selecting strategies by name.

use crate::{BollingerConfig, MACrossoverConfig, MacdConfig, RsiConfig, StrategyParams};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;
use trading_core::{error::StrategyError, traits::StrategyConfig};

/// Information about a registered strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyInfo {
    /// Registry key used on the command line
    pub key: String,
    /// Strategy name
    pub name: String,
    /// Strategy description
    pub description: String,
    /// Default configuration as JSON
    pub default_config: serde_json::Value,
}

/// Registry for available trading strategies.
pub struct StrategyRegistry {
    strategies: BTreeMap<String, StrategyInfo>,
}

impl StrategyRegistry {
    /// Create a new strategy registry with all built-in strategies.
    pub fn new() -> Self {
        let mut registry = Self {
            strategies: BTreeMap::new(),
        };

        registry.register(
            "ma_crossover",
            "MA Crossover",
            "Buys when the fast SMA crosses above the slow SMA, sells on the reverse cross",
            MACrossoverConfig::default(),
        );
        registry.register(
            "rsi",
            "RSI",
            "Buys below the oversold level, sells above the overbought level",
            RsiConfig::default(),
        );
        registry.register(
            "macd",
            "MACD",
            "Buys when MACD crosses above its signal line, sells on the reverse cross",
            MacdConfig::default(),
        );
        registry.register(
            "bollinger",
            "Bollinger Bands",
            "Buys on a close below the lower band, sells on a close above the upper band",
            BollingerConfig::default(),
        );

        registry
    }

    fn register<C: Serialize>(&mut self, key: &str, name: &str, description: &str, defaults: C) {
        let default_config = serde_json::to_value(defaults).unwrap_or(serde_json::Value::Null);
        self.strategies.insert(
            key.to_string(),
            StrategyInfo {
                key: key.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                default_config,
            },
        );
    }

    /// List all available strategies, ordered by key.
    pub fn list(&self) -> Vec<&StrategyInfo> {
        self.strategies.values().collect()
    }

    /// Get strategy info by name.
    pub fn get(&self, name: &str) -> Option<&StrategyInfo> {
        self.strategies.get(name)
    }

    /// Get all strategy names.
    pub fn names(&self) -> Vec<&String> {
        self.strategies.keys().collect()
    }

    /// Build validated parameters from a name and a JSON parameter object.
    ///
    /// Missing fields fall back to the strategy's defaults.
    pub fn create(
        &self,
        name: &str,
        config: serde_json::Value,
    ) -> Result<StrategyParams, StrategyError> {
        let params = match name {
            "ma_crossover" => StrategyParams::MaCrossover(parse(config)?),
            "rsi" => StrategyParams::Rsi(parse(config)?),
            "macd" => StrategyParams::Macd(parse(config)?),
            "bollinger" => StrategyParams::Bollinger(parse(config)?),
            _ => return Err(StrategyError::NotFound(name.to_string())),
        };
        params.validate()?;
        Ok(params)
    }

    /// Create a strategy with default configuration.
    pub fn create_default(&self, name: &str) -> Result<StrategyParams, StrategyError> {
        let info = self
            .get(name)
            .ok_or_else(|| StrategyError::NotFound(name.to_string()))?;
        self.create(name, info.default_config.clone())
    }
}

fn parse<C: DeserializeOwned>(config: serde_json::Value) -> Result<C, StrategyError> {
    // `null` means "no overrides".
    let config = if config.is_null() {
        serde_json::Value::Object(Default::default())
    } else {
        config
    };
    serde_json::from_value(config).map_err(|e| StrategyError::InvalidConfig(e.to_string()))
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_list() {
        let registry = StrategyRegistry::new();
        let strategies = registry.list();

        assert_eq!(strategies.len(), 4);
        assert_eq!(
            registry.names(),
            vec!["bollinger", "ma_crossover", "macd", "rsi"]
        );
    }

    #[test]
    fn test_registry_get() {
        let registry = StrategyRegistry::new();

        assert!(registry.get("ma_crossover").is_some());
        assert!(registry.get("macd").is_some());
        assert!(registry.get("unknown").is_none());
    }

    #[test]
    fn test_create_default() {
        let registry = StrategyRegistry::new();

        let params = registry.create_default("ma_crossover").unwrap();
        assert_eq!(params, StrategyParams::MaCrossover(MACrossoverConfig::default()));
    }

    #[test]
    fn test_create_with_config() {
        let registry = StrategyRegistry::new();

        let config = serde_json::json!({
            "fast_period": 5,
            "slow_period": 10
        });

        let params = registry.create("ma_crossover", config).unwrap();
        assert_eq!(
            params,
            StrategyParams::MaCrossover(MACrossoverConfig {
                fast_period: 5,
                slow_period: 10
            })
        );
    }

    #[test]
    fn test_create_null_config_uses_defaults() {
        let registry = StrategyRegistry::new();
        let params = registry.create("macd", serde_json::Value::Null).unwrap();
        assert_eq!(params, StrategyParams::Macd(MacdConfig::default()));
    }

    #[test]
    fn test_create_rejects_bad_values() {
        let registry = StrategyRegistry::new();

        let result = registry.create("rsi", serde_json::json!({"oversold": 90.0}));
        assert!(matches!(result, Err(StrategyError::InvalidConfig(_))));

        let result = registry.create("bollinger", serde_json::json!({"period": "twenty"}));
        assert!(matches!(result, Err(StrategyError::InvalidConfig(_))));
    }

    #[test]
    fn test_create_unknown_strategy() {
        let registry = StrategyRegistry::new();

        let result = registry.create_default("unknown");
        assert!(matches!(result, Err(StrategyError::NotFound(_))));
    }
}
