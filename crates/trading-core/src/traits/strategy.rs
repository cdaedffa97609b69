//! Strategy trait definitions.

use crate::error::StrategyError;
use crate::types::IndicatorSeries;

/// Configuration trait for strategies.
pub trait StrategyConfig: Send + Sync + Clone + 'static {
    /// Validate the configuration.
    fn validate(&self) -> Result<(), StrategyError>;
}

/// Signal rule evaluated against precomputed indicators.
///
/// Implementations are pure queries: asking about bar `t` never mutates
/// state and only looks at data up to and including `t`.
pub trait SignalRule: Send + Sync {
    /// Get the display name of this strategy.
    fn name(&self) -> &str;

    /// Whether a long entry is signalled at bar `t`.
    fn should_buy(&self, t: usize) -> bool;

    /// Whether an exit is signalled at bar `t`.
    fn should_sell(&self, t: usize) -> bool;

    /// First bar index at which every indicator this rule reads is defined.
    fn warmup_period(&self) -> usize;

    /// Indicator series the rule was built from, keyed by display name.
    fn indicators(&self) -> Vec<(&'static str, &IndicatorSeries)>;
}

/// Strict crossover of `a` over `b` at `t`: `a[t-1] <= b[t-1]` and `a[t] > b[t]`.
///
/// Undefined values on either bar, or `t == 0`, never count as a cross.
pub fn crosses_above(a: &IndicatorSeries, b: &IndicatorSeries, t: usize) -> bool {
    if t == 0 {
        return false;
    }
    match (a.get(t - 1), b.get(t - 1), a.get(t), b.get(t)) {
        (Some(a_prev), Some(b_prev), Some(a_now), Some(b_now)) => {
            a_prev <= b_prev && a_now > b_now
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[Option<f64>]) -> IndicatorSeries {
        IndicatorSeries::new(values.to_vec())
    }

    #[test]
    fn test_strict_cross() {
        let a = series(&[Some(1.0), Some(3.0)]);
        let b = series(&[Some(2.0), Some(2.0)]);
        assert!(crosses_above(&a, &b, 1));
        assert!(!crosses_above(&b, &a, 1));
    }

    #[test]
    fn test_touch_from_below_counts_from_equality() {
        // Equal on the previous bar, strictly above now: a cross.
        let a = series(&[Some(2.0), Some(3.0)]);
        let b = series(&[Some(2.0), Some(2.0)]);
        assert!(crosses_above(&a, &b, 1));
    }

    #[test]
    fn test_equality_on_crossing_bar_is_not_a_cross() {
        let a = series(&[Some(1.0), Some(2.0), Some(3.0)]);
        let b = series(&[Some(2.0), Some(2.0), Some(2.0)]);
        assert!(!crosses_above(&a, &b, 1));
        assert!(crosses_above(&a, &b, 2));
    }

    #[test]
    fn test_undefined_never_crosses() {
        let a = series(&[None, Some(3.0)]);
        let b = series(&[Some(2.0), Some(2.0)]);
        assert!(!crosses_above(&a, &b, 1));
        assert!(!crosses_above(&a, &b, 0));
    }
}
