//! OHLCV (Open, High, Low, Close, Volume) data types.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Timeframe;
use crate::error::DataError;

/// Largest price a bar may carry.
const MAX_PRICE: f64 = 1e12;

/// Compact OHLCV bar.
/// Uses f64 for fast indicator calculations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Bar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Check the bar for values the simulator cannot price against.
    fn check(&self) -> Result<(), String> {
        let prices = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ];
        for (field, value) in prices {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{} must be a positive finite price, got {}", field, value));
            }
            // Fills and marks are priced in Decimal
            if value > MAX_PRICE || Decimal::from_f64(value).map_or(true, |d| d.is_zero()) {
                return Err(format!("{} {} is outside the supported price range", field, value));
            }
        }
        if self.low > self.high {
            return Err(format!("low {} exceeds high {}", self.low, self.high));
        }
        for (field, value) in [("open", self.open), ("close", self.close)] {
            if value < self.low || value > self.high {
                return Err(format!(
                    "{} {} outside the bar range [{}, {}]",
                    field, value, self.low, self.high
                ));
            }
        }
        if !self.volume.is_finite() || self.volume < 0.0 {
            return Err(format!("volume must be non-negative, got {}", self.volume));
        }
        Ok(())
    }
}

impl Default for Bar {
    fn default() -> Self {
        Self {
            timestamp: 0,
            open: 0.0,
            high: 0.0,
            low: 0.0,
            close: 0.0,
            volume: 0.0,
        }
    }
}

/// Ordered bar series for a single instrument.
///
/// Timestamps are strictly ascending and every price is positive and finite;
/// both are checked on construction.
///
/// Only `Serialize` is derived; a series is built through [`BarSeries::new`].
#[derive(Debug, Clone, Serialize)]
pub struct BarSeries {
    /// Symbol identifier
    pub symbol: String,
    /// Timeframe of the bars
    pub timeframe: Timeframe,
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Create a validated bar series.
    pub fn new(
        symbol: impl Into<String>,
        timeframe: Timeframe,
        bars: Vec<Bar>,
    ) -> Result<Self, DataError> {
        for (index, bar) in bars.iter().enumerate() {
            bar.check()
                .map_err(|reason| DataError::InvalidBar { index, reason })?;

            if index > 0 {
                let previous = bars[index - 1].timestamp;
                if bar.timestamp <= previous {
                    return Err(DataError::OutOfOrder {
                        index,
                        previous,
                        timestamp: bar.timestamp,
                    });
                }
            }
        }

        Ok(Self {
            symbol: symbol.into(),
            timeframe,
            bars,
        })
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get all bars as a slice.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Get a bar by index (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// Get the first bar.
    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    /// Get the last bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Get an iterator over the bars.
    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }

    /// Keep only bars whose timestamp falls in `[start_ms, end_ms]`.
    pub fn slice_time(&self, start_ms: Option<i64>, end_ms: Option<i64>) -> BarSeries {
        let bars = self
            .bars
            .iter()
            .filter(|b| start_ms.map_or(true, |s| b.timestamp >= s))
            .filter(|b| end_ms.map_or(true, |e| b.timestamp <= e))
            .copied()
            .collect();

        Self {
            symbol: self.symbol.clone(),
            timeframe: self.timeframe,
            bars,
        }
    }
}
