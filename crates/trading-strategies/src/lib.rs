//! Trading strategy implementations.
//!
//! This crate provides the built-in long-only strategies:
//! - Moving Average Crossover
//! - RSI overbought/oversold
//! - MACD signal-line crossover
//! - Bollinger Bands breakout/breakdown
//!
//! Each strategy precomputes its indicators once from the close prices and
//! then answers per-bar buy/sell queries through [`trading_core::SignalRule`].

mod bollinger;
mod evaluator;
mod ma_crossover;
mod macd_strategy;
mod registry;
mod rsi_strategy;

pub use bollinger::{BollingerConfig, BollingerStrategy};
pub use evaluator::{SignalEvaluator, StrategyParams};
pub use ma_crossover::{MACrossoverConfig, MACrossoverStrategy};
pub use macd_strategy::{MacdConfig, MacdStrategy};
pub use registry::{StrategyInfo, StrategyRegistry};
pub use rsi_strategy::{RsiConfig, RsiStrategy};
