//! Position management for the backtesting engine.
//!
//! Provides position sizing, stop-loss/take-profit levels, and the cash and
//! position state machine the simulator drives.

mod position_manager;
mod position_sizer;
mod risk_config;
mod stop_loss;

pub use position_manager::{price_to_decimal, PositionManager};
pub use position_sizer::PositionSizer;
pub use risk_config::RiskConfig;
pub use stop_loss::StopLossManager;
