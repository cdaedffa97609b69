//! Indicator trait definitions.

use crate::error::IndicatorError;
use crate::types::IndicatorSeries;

/// Trait for technical indicators computed over a price slice.
///
/// Output is aligned 1:1 with the input; indices before [`Indicator::warmup`]
/// are undefined.
pub trait Indicator: Send + Sync {
    /// Calculate indicator values for the given data.
    ///
    /// # Arguments
    /// * `data` - Input data (typically close prices)
    ///
    /// # Returns
    /// A series of the same length as `data`
    fn calculate(&self, data: &[f64]) -> IndicatorSeries;

    /// Index of the first defined output.
    fn warmup(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Minimum number of data points needed for at least one defined value.
    fn min_points(&self) -> usize {
        self.warmup() + 1
    }

    /// Validate that there's enough data.
    fn validate_data(&self, data: &[f64]) -> Result<(), IndicatorError> {
        if data.len() < self.min_points() {
            return Err(IndicatorError::InsufficientData {
                required: self.min_points(),
                available: data.len(),
            });
        }
        Ok(())
    }
}

/// Multi-output indicator (e.g., Bollinger Bands, MACD).
///
/// Some indicators produce several related, aligned series.
pub trait MultiOutputIndicator: Send + Sync {
    /// The output type containing multiple series.
    type Outputs;

    /// Calculate indicator values for the given data.
    fn calculate(&self, data: &[f64]) -> Self::Outputs;

    /// Index of the first position where every output is defined.
    fn warmup(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}
