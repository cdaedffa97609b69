//! Position sizing.

use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Whole-unit sizer committing a fixed share of available cash.
#[derive(Debug, Clone)]
pub struct PositionSizer {
    position_size_pct: Decimal,
}

impl PositionSizer {
    /// Create a new position sizer. `position_size_pct` is in percent.
    pub fn new(position_size_pct: Decimal) -> Self {
        Self { position_size_pct }
    }

    /// Calculate position size.
    ///
    /// Returns `floor(cash * pct / 100 / price)`, or 0 when nothing is
    /// affordable or the quantity is not representable.
    pub fn calculate(&self, cash: Decimal, price: Decimal) -> u64 {
        if price <= Decimal::ZERO || cash <= Decimal::ZERO {
            return 0;
        }

        let units = cash
            .checked_mul(self.position_size_pct)
            .and_then(|v| v.checked_div(dec!(100)))
            .and_then(|available| available.checked_div(price));

        // Round down to whole units
        units.and_then(|u| u.floor().to_u64()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_allocation() {
        let sizer = PositionSizer::new(dec!(100));
        // 100000 / 99.7 = 1003.009...
        assert_eq!(sizer.calculate(dec!(100000), dec!(99.7)), 1003);
    }

    #[test]
    fn test_percent_of_cash() {
        let sizer = PositionSizer::new(dec!(5));
        // 5% of 100000 = 5000, at $100/share = 50 shares
        assert_eq!(sizer.calculate(dec!(100000), dec!(100)), 50);
    }

    #[test]
    fn test_unaffordable_is_zero() {
        let sizer = PositionSizer::new(dec!(100));
        assert_eq!(sizer.calculate(dec!(50), dec!(100)), 0);
        assert_eq!(sizer.calculate(dec!(-1), dec!(100)), 0);
        assert_eq!(sizer.calculate(dec!(1000), Decimal::ZERO), 0);
    }

    #[test]
    fn test_overflowing_quantity_is_zero() {
        let sizer = PositionSizer::new(dec!(100));
        assert_eq!(sizer.calculate(Decimal::MAX, dec!(1)), 0);
        assert_eq!(sizer.calculate(dec!(1000), dec!(0.0000000000000000000000001)), 0);
        assert_eq!(sizer.calculate(Decimal::from(1_000_000_000_000_000u64), dec!(0.0001)), 10_000_000_000_000_000_000);
    }
}
