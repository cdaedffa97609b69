//! Logging setup for the backtester binaries.

mod logging;

pub use logging::{setup_logging, LoggingError};
