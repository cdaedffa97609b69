//! Core traits for the backtesting system.

mod data_source;
mod indicator;
mod strategy;

pub use data_source::DataSource;
pub use indicator::{Indicator, MultiOutputIndicator};
pub use strategy::{crosses_above, SignalRule, StrategyConfig};
