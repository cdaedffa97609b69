//! Technical indicators for the backtesting engine.
//!
//! This crate provides the indicators the built-in strategies read:
//! - Moving averages (SMA, EMA)
//! - Momentum indicators (RSI, MACD)
//! - Volatility indicators (Bollinger Bands, Standard Deviation)
//!
//! Every indicator returns series aligned 1:1 with its input, with the
//! warm-up window left undefined.

pub mod momentum;
pub mod moving_average;
pub mod volatility;

pub use momentum::{Macd, MacdOutput, Rsi, RsiSmoothing};
pub use moving_average::{Ema, Sma};
pub use volatility::{BollingerBands, BollingerOutput, StdDev};
