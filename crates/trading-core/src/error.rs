//! Error types for the backtesting system.

use thiserror::Error;

/// Top-level error used at application boundaries (config loading, CLI).
#[derive(Error, Debug)]
pub enum TradingError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Backtest error: {0}")]
    Backtest(#[from] BacktestError),

    #[error("Strategy error: {0}")]
    Strategy(#[from] StrategyError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Errors raised by the simulation engine.
///
/// Ordinary outcomes such as "no trade occurred" are never errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BacktestError {
    /// Out-of-range configuration; raised before any bar is simulated.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Price series is empty")]
    EmptyData,

    #[error("Insufficient data: need at least {required} bars, have {available}")]
    InsufficientData { required: usize, available: usize },
}

impl From<IndicatorError> for BacktestError {
    fn from(err: IndicatorError) -> Self {
        match err {
            IndicatorError::InsufficientData {
                required,
                available,
            } => BacktestError::InsufficientData {
                required,
                available,
            },
            IndicatorError::InvalidParameter(msg) => BacktestError::InvalidParameter(msg),
        }
    }
}

impl From<StrategyError> for BacktestError {
    fn from(err: StrategyError) -> Self {
        BacktestError::InvalidParameter(err.to_string())
    }
}

/// Strategy-specific errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrategyError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Strategy not found: {0}")]
    NotFound(String),
}

impl From<IndicatorError> for StrategyError {
    fn from(err: IndicatorError) -> Self {
        StrategyError::InvalidConfig(err.to_string())
    }
}

/// Data source errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("Data file not found: {0}")]
    NotFound(String),

    #[error("No data available for the requested range")]
    NoDataAvailable,

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Bars out of order at index {index}: {timestamp} does not follow {previous}")]
    OutOfOrder {
        index: usize,
        previous: i64,
        timestamp: i64,
    },

    #[error("Invalid bar at index {index}: {reason}")]
    InvalidBar { index: usize, reason: String },
}

/// Indicator calculation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for application-level operations.
pub type TradingResult<T> = Result<T, TradingError>;
