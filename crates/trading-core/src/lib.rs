//! Core types and traits for the backtesting system.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, BarSeries, Timeframe)
//! - Indicator series with explicit warm-up (undefined) positions
//! - Position, trade and equity records produced by a simulation
//! - Core traits for indicators, strategy rules and data sources

pub mod error;
pub mod traits;
pub mod types;

pub use error::{
    BacktestError, DataError, IndicatorError, StrategyError, TradingError, TradingResult,
};
pub use traits::*;
pub use types::*;
