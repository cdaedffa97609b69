//! Cash and single-position bookkeeping for a simulation run.

use crate::{PositionSizer, RiskConfig, StopLossManager};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;
use trading_core::types::{Bar, ExitReason, Position, PositionState, Trade};

/// Convert a validated bar price to a decimal amount.
pub fn price_to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Owns the account cash and the `Flat | Long` state machine.
///
/// At most one position is open at any time. Every fill pays
/// `commission_rate * notional`.
#[derive(Debug, Clone)]
pub struct PositionManager {
    cash: Decimal,
    state: PositionState,
    commission_rate: Decimal,
    sizer: PositionSizer,
    stops: StopLossManager,
}

impl PositionManager {
    /// Create a flat account. `risk` is expected to be validated already.
    pub fn new(initial_cash: Decimal, risk: &RiskConfig) -> Self {
        Self {
            cash: initial_cash,
            state: PositionState::Flat,
            commission_rate: risk.commission_rate,
            sizer: PositionSizer::new(risk.position_size_pct),
            stops: StopLossManager::new(risk.stop_loss_pct, risk.take_profit_pct),
        }
    }

    pub fn cash(&self) -> Decimal {
        self.cash
    }

    pub fn is_flat(&self) -> bool {
        self.state.is_flat()
    }

    pub fn position(&self) -> Option<&Position> {
        self.state.position()
    }

    /// Open a long position at the bar close if flat and affordable.
    ///
    /// Returns the new position, or `None` when already long or the sized
    /// quantity rounds down to zero.
    pub fn try_enter(&mut self, index: usize, bar: &Bar) -> Option<&Position> {
        if !self.state.is_flat() {
            return None;
        }

        let entry_price = price_to_decimal(bar.close);
        let size = self.sizer.calculate(self.cash, entry_price);
        if size == 0 {
            debug!(
                index,
                cash = %self.cash,
                price = %entry_price,
                "Entry suppressed: position size rounds to zero"
            );
            return None;
        }

        let notional = entry_price * Decimal::from(size);
        let entry_commission = notional * self.commission_rate;
        self.cash -= notional + entry_commission;

        let position = Position {
            entry_index: index,
            entry_time: bar.timestamp,
            entry_price,
            size,
            stop_price: self.stops.calculate_stop_price(entry_price),
            target_price: self.stops.calculate_target_price(entry_price),
            entry_commission,
        };

        debug!(
            index,
            price = %entry_price,
            size,
            commission = %entry_commission,
            cash = %self.cash,
            "Entered long"
        );

        self.state = PositionState::Long(position);
        self.state.position()
    }

    /// Check whether the bar's low/high hits the open position's stop or target.
    pub fn check_exit_triggers(&self, bar: &Bar) -> Option<(ExitReason, Decimal)> {
        let position = self.state.position()?;
        self.stops.check_triggers(
            position,
            price_to_decimal(bar.low),
            price_to_decimal(bar.high),
        )
    }

    /// Close the open position at `exit_price` and return the completed trade.
    pub fn exit(
        &mut self,
        index: usize,
        timestamp: i64,
        exit_price: Decimal,
        reason: ExitReason,
    ) -> Option<Trade> {
        let position = self.state.take()?;

        let quantity = position.quantity();
        let proceeds = exit_price * quantity;
        let exit_commission = proceeds * self.commission_rate;
        self.cash += proceeds - exit_commission;

        let cost_basis = position.cost_basis();
        let commission = position.entry_commission + exit_commission;
        let pnl = (exit_price - position.entry_price) * quantity - commission;
        let return_pct = if cost_basis.is_zero() {
            Decimal::ZERO
        } else {
            pnl / cost_basis * dec!(100)
        };

        debug!(
            index,
            price = %exit_price,
            reason = %reason,
            pnl = %pnl,
            cash = %self.cash,
            "Exited long"
        );

        Some(Trade {
            entry_index: position.entry_index,
            exit_index: index,
            entry_time: position.entry_time,
            entry_price: position.entry_price,
            exit_time: timestamp,
            exit_price,
            size: position.size,
            pnl,
            return_pct,
            commission,
            exit_reason: reason,
        })
    }

    /// Cash plus the open position marked at `mark`.
    pub fn equity(&self, mark: f64) -> Decimal {
        match self.state.position() {
            Some(position) => self.cash + position.market_value(price_to_decimal(mark)),
            None => self.cash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(close: f64, low: f64, high: f64) -> Bar {
        Bar::new(0, close, high, low, close, 1000.0)
    }

    fn risk(stop: Decimal, target: Decimal) -> RiskConfig {
        RiskConfig {
            commission_rate: dec!(0.002),
            stop_loss_pct: stop,
            take_profit_pct: target,
            position_size_pct: dec!(100),
        }
    }

    #[test]
    fn test_entry_deducts_notional_and_commission() {
        let mut manager = PositionManager::new(dec!(10000), &risk(dec!(5), dec!(10)));
        let position = manager.try_enter(3, &bar(100.0, 99.0, 101.0)).unwrap().clone();

        assert_eq!(position.size, 100);
        assert_eq!(position.entry_price, dec!(100));
        assert_eq!(position.entry_commission, dec!(20));
        assert_eq!(position.stop_price, Some(dec!(95)));
        assert_eq!(position.target_price, Some(dec!(110)));
        // 10000 - 10000 - 20
        assert_eq!(manager.cash(), dec!(-20));
        assert!(!manager.is_flat());
    }

    #[test]
    fn test_no_second_entry_while_long() {
        let mut manager = PositionManager::new(dec!(100000), &RiskConfig::default());
        assert!(manager.try_enter(0, &bar(100.0, 99.0, 101.0)).is_some());
        let cash = manager.cash();
        assert!(manager.try_enter(1, &bar(50.0, 49.0, 51.0)).is_none());
        assert_eq!(manager.cash(), cash);
    }

    #[test]
    fn test_zero_size_suppresses_entry() {
        let mut manager = PositionManager::new(dec!(50), &RiskConfig::default());
        assert!(manager.try_enter(0, &bar(100.0, 99.0, 101.0)).is_none());
        assert!(manager.is_flat());
        assert_eq!(manager.cash(), dec!(50));
    }

    #[test]
    fn test_round_trip_pnl_formula() {
        let mut manager = PositionManager::new(dec!(10000), &risk(Decimal::ZERO, Decimal::ZERO));
        manager.try_enter(0, &bar(100.0, 99.0, 101.0));
        let trade = manager
            .exit(5, 500, dec!(110), ExitReason::Signal)
            .unwrap();

        let rate = dec!(0.002);
        let expected = (dec!(110) - dec!(100)) * dec!(100)
            - rate * (dec!(100) * dec!(100) + dec!(110) * dec!(100));
        assert_eq!(trade.pnl, expected);
        assert_eq!(trade.commission, dec!(42));
        assert_eq!(trade.bars_held(), 5);
        assert_eq!(manager.cash() - dec!(10000), trade.pnl);
        assert!(manager.is_flat());
    }

    #[test]
    fn test_exit_when_flat_is_none() {
        let mut manager = PositionManager::new(dec!(10000), &RiskConfig::default());
        assert!(manager.exit(0, 0, dec!(1), ExitReason::EndOfData).is_none());
    }

    #[test]
    fn test_trigger_checks_use_bar_range() {
        let mut manager = PositionManager::new(dec!(10000), &risk(dec!(5), dec!(10)));
        assert!(manager.check_exit_triggers(&bar(100.0, 1.0, 200.0)).is_none());

        manager.try_enter(0, &bar(100.0, 99.0, 101.0));
        assert_eq!(manager.check_exit_triggers(&bar(100.0, 96.0, 104.0)), None);
        assert_eq!(
            manager.check_exit_triggers(&bar(97.0, 94.0, 111.0)),
            Some((ExitReason::StopLoss, dec!(95)))
        );
        assert_eq!(
            manager.check_exit_triggers(&bar(108.0, 100.0, 111.0)),
            Some((ExitReason::TakeProfit, dec!(110)))
        );
    }

    #[test]
    fn test_equity_marks_open_position() {
        let mut manager = PositionManager::new(dec!(10000), &risk(Decimal::ZERO, Decimal::ZERO));
        assert_eq!(manager.equity(100.0), dec!(10000));

        manager.try_enter(0, &bar(100.0, 99.0, 101.0));
        // cash -20 + 100 * 105
        assert_eq!(manager.equity(105.0), dec!(10480));
    }
}
