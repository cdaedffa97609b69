//! Core data types for the backtesting system.

mod ohlcv;
mod position;
mod series;
mod timeframe;
mod trade;

pub use ohlcv::{Bar, BarSeries};
pub use position::{Position, PositionState};
pub use series::IndicatorSeries;
pub use timeframe::Timeframe;
pub use trade::{EquityPoint, ExitReason, Trade};
