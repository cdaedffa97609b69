//! Volatility indicators.

use serde::{Deserialize, Serialize};
use trading_core::error::IndicatorError;
use trading_core::traits::{Indicator, MultiOutputIndicator};
use trading_core::types::IndicatorSeries;

/// Sample mean and standard deviation (n-1 denominator) of a window.
fn mean_and_sample_std(window: &[f64]) -> (f64, f64) {
    let n = window.len() as f64;
    let mean = window.iter().sum::<f64>() / n;
    let variance = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, variance.sqrt())
}

/// Rolling sample standard deviation.
#[derive(Debug, Clone)]
pub struct StdDev {
    period: usize,
}

impl StdDev {
    /// Create a new standard deviation indicator. Requires `period >= 2`.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        if period < 2 {
            return Err(IndicatorError::InvalidParameter(format!(
                "StdDev period must be at least 2, got {period}"
            )));
        }
        Ok(Self { period })
    }
}

impl Indicator for StdDev {
    fn calculate(&self, data: &[f64]) -> IndicatorSeries {
        let mut result = vec![None; data.len()];

        for (i, window) in data.windows(self.period).enumerate() {
            let (_, std_dev) = mean_and_sample_std(window);
            result[i + self.period - 1] = Some(std_dev);
        }

        IndicatorSeries::new(result)
    }

    fn warmup(&self) -> usize {
        self.period - 1
    }

    fn name(&self) -> &str {
        "StdDev"
    }
}

/// Bollinger Bands output, aligned with the input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BollingerOutput {
    /// Upper band
    pub upper: IndicatorSeries,
    /// Middle band (SMA)
    pub middle: IndicatorSeries,
    /// Lower band
    pub lower: IndicatorSeries,
}

impl BollingerOutput {
    /// Check if price is strictly above the upper band at `t`.
    pub fn is_above_upper(&self, t: usize, price: f64) -> bool {
        self.upper.get(t).is_some_and(|upper| price > upper)
    }

    /// Check if price is strictly below the lower band at `t`.
    pub fn is_below_lower(&self, t: usize, price: f64) -> bool {
        self.lower.get(t).is_some_and(|lower| price < lower)
    }
}

/// Bollinger Bands.
///
/// Consists of a middle band (SMA) with upper and lower bands
/// at a specified number of sample standard deviations.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl BollingerBands {
    /// Create Bollinger Bands with custom parameters.
    pub fn new(period: usize, std_dev_multiplier: f64) -> Result<Self, IndicatorError> {
        if period < 2 {
            return Err(IndicatorError::InvalidParameter(format!(
                "Bollinger period must be at least 2, got {period}"
            )));
        }
        if !(std_dev_multiplier.is_finite() && std_dev_multiplier > 0.0) {
            return Err(IndicatorError::InvalidParameter(format!(
                "Bollinger std dev multiplier must be positive, got {std_dev_multiplier}"
            )));
        }
        Ok(Self {
            period,
            std_dev_multiplier,
        })
    }
}

impl MultiOutputIndicator for BollingerBands {
    type Outputs = BollingerOutput;

    fn calculate(&self, data: &[f64]) -> BollingerOutput {
        let mut upper = vec![None; data.len()];
        let mut middle = vec![None; data.len()];
        let mut lower = vec![None; data.len()];

        for (i, window) in data.windows(self.period).enumerate() {
            let (mean, std_dev) = mean_and_sample_std(window);
            let t = i + self.period - 1;

            middle[t] = Some(mean);
            upper[t] = Some(mean + self.std_dev_multiplier * std_dev);
            lower[t] = Some(mean - self.std_dev_multiplier * std_dev);
        }

        BollingerOutput {
            upper: upper.into(),
            middle: middle.into(),
            lower: lower.into(),
        }
    }

    fn warmup(&self) -> usize {
        self.period - 1
    }

    fn name(&self) -> &str {
        "Bollinger Bands"
    }
}
