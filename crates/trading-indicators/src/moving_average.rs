//! Moving average indicators.

use trading_core::error::IndicatorError;
use trading_core::traits::Indicator;
use trading_core::types::IndicatorSeries;

/// Simple Moving Average (SMA).
///
/// Calculates the arithmetic mean of the last N values. Undefined for the
/// first `period - 1` positions. Each window is summed afresh so identical
/// windows always produce identical means.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "SMA period must be greater than 0".to_string(),
            ));
        }
        Ok(Self { period })
    }
}

impl Indicator for Sma {
    fn calculate(&self, data: &[f64]) -> IndicatorSeries {
        let mut result = vec![None; data.len()];
        if data.len() < self.period {
            return IndicatorSeries::new(result);
        }

        let period_f64 = self.period as f64;
        for (i, window) in data.windows(self.period).enumerate() {
            result[i + self.period - 1] = Some(window.iter().sum::<f64>() / period_f64);
        }

        IndicatorSeries::new(result)
    }

    fn warmup(&self) -> usize {
        self.period - 1
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Exponential Moving Average (EMA).
///
/// Seeded with the first price and defined from index 0:
/// `ema[t] = a * price[t] + (1 - a) * ema[t-1]` with `a = 2 / (span + 1)`.
#[derive(Debug, Clone)]
pub struct Ema {
    multiplier: f64,
}

impl Ema {
    /// Create a new EMA with the specified span.
    pub fn new(span: usize) -> Result<Self, IndicatorError> {
        if span == 0 {
            return Err(IndicatorError::InvalidParameter(
                "EMA span must be greater than 0".to_string(),
            ));
        }
        let multiplier = 2.0 / (span as f64 + 1.0);
        Ok(Self { multiplier })
    }

    /// Run the recursion over any slice, including derived series such as a MACD line.
    pub(crate) fn smooth(&self, data: &[f64]) -> Vec<f64> {
        let mut result = Vec::with_capacity(data.len());
        let one_minus_mult = 1.0 - self.multiplier;

        let mut iter = data.iter();
        if let Some(&first) = iter.next() {
            let mut ema = first;
            result.push(ema);
            for &price in iter {
                ema = price * self.multiplier + ema * one_minus_mult;
                result.push(ema);
            }
        }

        result
    }
}

impl Indicator for Ema {
    fn calculate(&self, data: &[f64]) -> IndicatorSeries {
        IndicatorSeries::from_defined(self.smooth(data))
    }

    fn warmup(&self) -> usize {
        0
    }

    fn name(&self) -> &str {
        "EMA"
    }
}
