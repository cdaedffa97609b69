//! Indicator series aligned with the bar series.

use serde::{Deserialize, Serialize};

/// Indicator values aligned 1:1 with the bars they were derived from.
///
/// Positions inside the warm-up window hold `None`; consumers must treat
/// them as "not computable" rather than as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    /// Wrap an already aligned vector.
    pub fn new(values: Vec<Option<f64>>) -> Self {
        Self { values }
    }

    /// A series defined everywhere.
    pub fn from_defined(values: Vec<f64>) -> Self {
        Self {
            values: values.into_iter().map(Some).collect(),
        }
    }

    /// Value at `index`, or `None` if undefined or out of range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    /// Index of the first defined value.
    pub fn first_defined(&self) -> Option<usize> {
        self.values.iter().position(Option::is_some)
    }

    /// Number of positions (defined or not).
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw aligned values.
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Iterate over defined values only.
    pub fn defined(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().filter_map(|v| *v)
    }
}

impl From<Vec<Option<f64>>> for IndicatorSeries {
    fn from(values: Vec<Option<f64>>) -> Self {
        Self::new(values)
    }
}
