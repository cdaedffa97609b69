//! Momentum indicators.

use crate::moving_average::Ema;
use serde::{Deserialize, Serialize};
use trading_core::error::IndicatorError;
use trading_core::traits::{Indicator, MultiOutputIndicator};
use trading_core::types::IndicatorSeries;

/// How RSI averages gains and losses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiSmoothing {
    /// Plain rolling mean over the last `period` deltas
    #[default]
    Simple,
    /// Wilder's recursive smoothing, seeded with the simple mean
    Wilder,
}

/// Relative Strength Index (RSI).
///
/// Measures the speed and magnitude of recent price changes
/// to evaluate overbought or oversold conditions. First defined at
/// index `period`, the first position with `period` price deltas behind it.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    smoothing: RsiSmoothing,
}

impl Rsi {
    /// Create a new RSI indicator with simple rolling averages.
    ///
    /// Common periods are 14 (default) or 9.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        Self::with_smoothing(period, RsiSmoothing::Simple)
    }

    pub fn with_smoothing(period: usize, smoothing: RsiSmoothing) -> Result<Self, IndicatorError> {
        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "RSI period must be greater than 0".to_string(),
            ));
        }
        Ok(Self { period, smoothing })
    }

    /// Map average gain and loss to the 0..=100 scale.
    fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            if avg_gain == 0.0 {
                50.0
            } else {
                100.0
            }
        } else {
            100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
        }
    }

    /// Rolling mean of `values` over `period`, one entry per full window.
    fn simple_average(values: &[f64], period: usize) -> Vec<f64> {
        let period_f64 = period as f64;
        values
            .windows(period)
            .map(|window| window.iter().sum::<f64>() / period_f64)
            .collect()
    }

    /// Calculate using Wilder's smoothing method.
    fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
        if values.len() < period {
            return vec![];
        }

        let mut result = Vec::with_capacity(values.len() - period + 1);
        let period_f64 = period as f64;

        // Initial average
        let mut avg: f64 = values[..period].iter().sum::<f64>() / period_f64;
        result.push(avg);

        // Wilder's smoothing: avg = (prev_avg * (period-1) + value) / period
        for &value in &values[period..] {
            avg = (avg * (period_f64 - 1.0) + value) / period_f64;
            result.push(avg);
        }

        result
    }
}

impl Indicator for Rsi {
    fn calculate(&self, data: &[f64]) -> IndicatorSeries {
        let mut result = vec![None; data.len()];
        if data.len() <= self.period {
            return IndicatorSeries::new(result);
        }

        // gains[i] and losses[i] describe the move from data[i] to data[i + 1]
        let (gains, losses): (Vec<f64>, Vec<f64>) = data
            .windows(2)
            .map(|pair| {
                let change = pair[1] - pair[0];
                if change > 0.0 {
                    (change, 0.0)
                } else {
                    (0.0, -change)
                }
            })
            .unzip();

        let (avg_gains, avg_losses) = match self.smoothing {
            RsiSmoothing::Simple => (
                Self::simple_average(&gains, self.period),
                Self::simple_average(&losses, self.period),
            ),
            RsiSmoothing::Wilder => (
                Self::wilder_smooth(&gains, self.period),
                Self::wilder_smooth(&losses, self.period),
            ),
        };

        for (i, (&gain, &loss)) in avg_gains.iter().zip(avg_losses.iter()).enumerate() {
            result[i + self.period] = Some(Self::rsi_value(gain, loss));
        }

        IndicatorSeries::new(result)
    }

    fn warmup(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// MACD (Moving Average Convergence Divergence) output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MacdOutput {
    /// MACD line (fast EMA - slow EMA)
    pub macd: IndicatorSeries,
    /// Signal line (EMA of MACD)
    pub signal: IndicatorSeries,
    /// Histogram (MACD - Signal)
    pub histogram: IndicatorSeries,
}

/// MACD indicator.
///
/// Uses two EMAs to identify trend direction and momentum. Every output is
/// defined from index 0 because the underlying EMAs are.
#[derive(Debug, Clone)]
pub struct Macd {
    fast: Ema,
    slow: Ema,
    signal: Ema,
}

impl Macd {
    /// Create a MACD with custom spans.
    pub fn new(fast: usize, slow: usize, signal: usize) -> Result<Self, IndicatorError> {
        Ok(Self {
            fast: Ema::new(fast)?,
            slow: Ema::new(slow)?,
            signal: Ema::new(signal)?,
        })
    }
}

impl MultiOutputIndicator for Macd {
    type Outputs = MacdOutput;

    fn calculate(&self, data: &[f64]) -> MacdOutput {
        let fast_ema = self.fast.smooth(data);
        let slow_ema = self.slow.smooth(data);

        let macd_line: Vec<f64> = fast_ema
            .iter()
            .zip(slow_ema.iter())
            .map(|(f, s)| f - s)
            .collect();

        let signal_line = self.signal.smooth(&macd_line);

        let histogram: Vec<f64> = macd_line
            .iter()
            .zip(signal_line.iter())
            .map(|(m, s)| m - s)
            .collect();

        MacdOutput {
            macd: IndicatorSeries::from_defined(macd_line),
            signal: IndicatorSeries::from_defined(signal_line),
            histogram: IndicatorSeries::from_defined(histogram),
        }
    }

    fn warmup(&self) -> usize {
        0
    }

    fn name(&self) -> &str {
        "MACD"
    }
}
