//! Historical bar loading.

mod csv_source;

pub use csv_source::{parse_timestamp, CsvDataSource};

use chrono::{DateTime, Utc};
use std::path::Path;
use trading_core::error::DataError;
use trading_core::traits::DataSource;
use trading_core::types::{BarSeries, Timeframe};

/// Load a validated series from a CSV file, optionally limited to an
/// inclusive date range.
pub async fn load_csv(
    path: impl AsRef<Path>,
    symbol: &str,
    timeframe: Timeframe,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<BarSeries, DataError> {
    let source = CsvDataSource::new(path)?;
    source.get_historical_bars(symbol, timeframe, start, end).await
}
