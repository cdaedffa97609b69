//! Closed trades and equity curve points.

use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    /// Bar low reached the stop price
    StopLoss,
    /// Bar high reached the target price
    TakeProfit,
    /// Strategy emitted a sell signal
    Signal,
    /// Series ended with the position still open
    EndOfData,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExitReason::StopLoss => "stop_loss",
            ExitReason::TakeProfit => "take_profit",
            ExitReason::Signal => "signal",
            ExitReason::EndOfData => "end_of_data",
        };
        f.write_str(s)
    }
}

/// Immutable record of a completed round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub entry_index: usize,
    pub exit_index: usize,
    /// Unix milliseconds
    pub entry_time: i64,
    pub entry_price: Decimal,
    /// Unix milliseconds
    pub exit_time: i64,
    pub exit_price: Decimal,
    pub size: u64,
    /// Net of entry and exit commission
    pub pnl: Decimal,
    /// pnl relative to the entry notional, in percent
    pub return_pct: Decimal,
    /// Entry plus exit commission
    pub commission: Decimal,
    pub exit_reason: ExitReason,
}

impl Trade {
    /// A trade with strictly positive net P&L.
    pub fn is_win(&self) -> bool {
        self.pnl > Decimal::ZERO
    }

    /// A trade with strictly negative net P&L.
    pub fn is_loss(&self) -> bool {
        self.pnl < Decimal::ZERO
    }

    /// Number of bars between entry and exit.
    pub fn bars_held(&self) -> usize {
        self.exit_index - self.entry_index
    }
}

/// Account equity at the close of one simulated bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    /// Unix milliseconds
    pub timestamp: i64,
    /// Cash plus mark-to-market value of the open position
    pub equity: Decimal,
    /// Whether a position was held at the close of the bar
    pub in_market: bool,
}

impl EquityPoint {
    pub fn new(timestamp: i64, equity: Decimal, in_market: bool) -> Self {
        Self {
            timestamp,
            equity,
            in_market,
        }
    }

    #[inline]
    pub fn equity_f64(&self) -> f64 {
        self.equity.to_f64().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn trade(pnl: Decimal) -> Trade {
        Trade {
            entry_index: 10,
            exit_index: 14,
            entry_time: 0,
            entry_price: dec!(100),
            exit_time: 4,
            exit_price: dec!(105),
            size: 10,
            pnl,
            return_pct: dec!(4.59),
            commission: dec!(4.1),
            exit_reason: ExitReason::Signal,
        }
    }

    #[test]
    fn test_trade_classification() {
        assert!(trade(dec!(45.9)).is_win());
        assert!(trade(dec!(-1)).is_loss());
        let flat = trade(Decimal::ZERO);
        assert!(!flat.is_win());
        assert!(!flat.is_loss());
    }

    #[test]
    fn test_bars_held_and_return() {
        let t = trade(dec!(45.9));
        assert_eq!(t.bars_held(), 4);
        assert_eq!(t.return_pct, dec!(4.59));
    }

    #[test]
    fn test_exit_reason_serialization() {
        let json = serde_json::to_string(&ExitReason::TakeProfit).unwrap();
        assert_eq!(json, "\"take_profit\"");
        assert_eq!(ExitReason::EndOfData.to_string(), "end_of_data");
    }

    #[test]
    fn test_equity_point() {
        let point = EquityPoint::new(5, dec!(100500.25), true);
        assert!((point.equity_f64() - 100500.25).abs() < 1e-9);
    }
}
