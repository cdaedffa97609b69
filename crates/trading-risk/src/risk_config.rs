//! Per-run trading cost and exit settings.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use trading_core::error::BacktestError;

/// Commission, sizing and protective exit settings for one backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Fraction of traded notional charged on each fill (0.002 = 0.2%)
    pub commission_rate: Decimal,
    /// Stop-loss distance below entry in percent; 0 disables
    pub stop_loss_pct: Decimal,
    /// Take-profit distance above entry in percent; 0 disables
    pub take_profit_pct: Decimal,
    /// Share of available cash committed to each entry, in percent
    pub position_size_pct: Decimal,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            commission_rate: dec!(0.002),
            stop_loss_pct: Decimal::ZERO,
            take_profit_pct: Decimal::ZERO,
            position_size_pct: dec!(100),
        }
    }
}

impl RiskConfig {
    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<(), BacktestError> {
        if self.commission_rate < Decimal::ZERO || self.commission_rate > Decimal::ONE {
            return Err(BacktestError::InvalidParameter(format!(
                "commission_rate must be between 0 and 1, got {}",
                self.commission_rate
            )));
        }
        check_percent("stop_loss_pct", self.stop_loss_pct)?;
        check_percent("take_profit_pct", self.take_profit_pct)?;
        if self.position_size_pct <= Decimal::ZERO || self.position_size_pct > dec!(100) {
            return Err(BacktestError::InvalidParameter(format!(
                "position_size_pct must be in (0, 100], got {}",
                self.position_size_pct
            )));
        }
        Ok(())
    }
}

fn check_percent(name: &str, value: Decimal) -> Result<(), BacktestError> {
    if value < Decimal::ZERO || value > dec!(100) {
        return Err(BacktestError::InvalidParameter(format!(
            "{name} must be between 0 and 100, got {value}"
        )));
    }
    Ok(())
}
