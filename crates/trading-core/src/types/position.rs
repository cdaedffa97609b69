//! Open position state for a single-instrument simulation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An open long position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Index of the entry bar
    pub entry_index: usize,
    /// Entry bar timestamp (Unix milliseconds)
    pub entry_time: i64,
    /// Fill price of the entry
    pub entry_price: Decimal,
    /// Number of whole units held
    pub size: u64,
    /// Protective stop level, if enabled
    pub stop_price: Option<Decimal>,
    /// Profit target level, if enabled
    pub target_price: Option<Decimal>,
    /// Commission paid on entry
    pub entry_commission: Decimal,
}

impl Position {
    /// Size as a Decimal for money arithmetic.
    #[inline]
    pub fn quantity(&self) -> Decimal {
        Decimal::from(self.size)
    }

    /// Notional value at entry.
    pub fn cost_basis(&self) -> Decimal {
        self.entry_price * self.quantity()
    }

    /// Value of the position marked at `price`.
    pub fn market_value(&self, price: Decimal) -> Decimal {
        price * self.quantity()
    }
}

/// Position state machine: at most one position is ever open.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PositionState {
    #[default]
    Flat,
    Long(Position),
}

impl PositionState {
    /// Check if no position is open.
    pub fn is_flat(&self) -> bool {
        matches!(self, PositionState::Flat)
    }

    /// Borrow the open position, if any.
    pub fn position(&self) -> Option<&Position> {
        match self {
            PositionState::Flat => None,
            PositionState::Long(position) => Some(position),
        }
    }

    /// Take the open position out, leaving the state flat.
    pub fn take(&mut self) -> Option<Position> {
        match std::mem::take(self) {
            PositionState::Flat => None,
            PositionState::Long(position) => Some(position),
        }
    }
}
