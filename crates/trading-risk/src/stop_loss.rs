//! Stop-loss and take-profit management.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use trading_core::types::{ExitReason, Position};

/// Fixed-percentage protective exits for long positions.
#[derive(Debug, Clone)]
pub struct StopLossManager {
    stop_loss_pct: Decimal,
    take_profit_pct: Decimal,
}

impl StopLossManager {
    /// Create a new stop-loss manager. A percentage of zero disables that exit.
    pub fn new(stop_loss_pct: Decimal, take_profit_pct: Decimal) -> Self {
        Self {
            stop_loss_pct,
            take_profit_pct,
        }
    }

    /// Calculate stop-loss price for a new long position.
    pub fn calculate_stop_price(&self, entry_price: Decimal) -> Option<Decimal> {
        (self.stop_loss_pct > Decimal::ZERO)
            .then(|| entry_price * (dec!(1) - self.stop_loss_pct / dec!(100)))
    }

    /// Calculate take-profit price for a new long position.
    pub fn calculate_target_price(&self, entry_price: Decimal) -> Option<Decimal> {
        (self.take_profit_pct > Decimal::ZERO)
            .then(|| entry_price * (dec!(1) + self.take_profit_pct / dec!(100)))
    }

    /// Check the bar's range against the position's levels.
    ///
    /// The stop is checked first, so a bar that spans both levels exits at
    /// the stop. Returns the exit reason and fill price.
    pub fn check_triggers(
        &self,
        position: &Position,
        low: Decimal,
        high: Decimal,
    ) -> Option<(ExitReason, Decimal)> {
        if let Some(stop) = position.stop_price {
            if low <= stop {
                return Some((ExitReason::StopLoss, stop));
            }
        }
        if let Some(target) = position.target_price {
            if high >= target {
                return Some((ExitReason::TakeProfit, target));
            }
        }
        None
    }
}
