//! CSV data source.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use trading_core::error::DataError;
use trading_core::traits::DataSource;
use trading_core::types::{Bar, BarSeries, Timeframe};

/// One row of an OHLCV file. Lowercase headers and the capitalized vendor
/// spellings listed as aliases are accepted; other spellings are not.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(
        alias = "Date",
        alias = "Datetime",
        alias = "datetime",
        alias = "timestamp",
        alias = "Timestamp",
        alias = "time",
        alias = "Time"
    )]
    date: String,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(alias = "Volume", default)]
    volume: f64,
}

/// Historical bars from a single CSV file.
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    path: PathBuf,
}

impl CsvDataSource {
    /// Create a source for `path`, failing early if the file is missing.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(DataError::NotFound(path.display().to_string()));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Read every row, sort by time and validate the result.
    pub fn load(&self, symbol: &str, timeframe: Timeframe) -> Result<BarSeries, DataError> {
        let mut bars = self.read_bars()?;
        bars.sort_by_key(|b| b.timestamp);

        info!(
            path = %self.path.display(),
            symbol,
            bars = bars.len(),
            "Loaded CSV data"
        );
        BarSeries::new(symbol, timeframe, bars)
    }

    /// Load and keep only bars inside the inclusive `[start, end]` range.
    pub fn load_range(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<BarSeries, DataError> {
        let series = self.load(symbol, timeframe)?;
        if start.is_none() && end.is_none() {
            return Ok(series);
        }

        let sliced = series.slice_time(
            start.map(|dt| dt.timestamp_millis()),
            end.map(|dt| dt.timestamp_millis()),
        );
        debug!(
            before = series.len(),
            after = sliced.len(),
            "Applied date filter"
        );

        if sliced.is_empty() {
            return Err(DataError::NoDataAvailable);
        }
        Ok(sliced)
    }

    fn read_bars(&self) -> Result<Vec<Bar>, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_path(&self.path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let mut bars = Vec::new();
        for (row, result) in reader.deserialize().enumerate() {
            let record: CsvRecord =
                result.map_err(|e| DataError::ParseError(format!("row {}: {}", row + 1, e)))?;
            let timestamp = parse_timestamp(&record.date)?;

            bars.push(Bar::new(
                timestamp,
                record.open,
                record.high,
                record.low,
                record.close,
                record.volume,
            ));
        }

        Ok(bars)
    }
}

#[async_trait]
impl DataSource for CsvDataSource {
    async fn get_historical_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<BarSeries, DataError> {
        self.load_range(symbol, timeframe, start, end)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// Parse a date or timestamp into Unix milliseconds (UTC).
///
/// Accepts ISO dates, date-times with or without an offset, a few
/// day-first/month-first layouts and raw Unix seconds or milliseconds.
pub fn parse_timestamp(value: &str) -> Result<i64, DataError> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%:z") {
        return Ok(dt.timestamp_millis());
    }

    const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(value, format) {
            return Ok(d.and_time(NaiveTime::MIN).and_utc().timestamp_millis());
        }
    }

    // Unix time; anything past 10^10 is already in milliseconds
    if let Ok(ts) = value.parse::<i64>() {
        return Ok(if ts > 10_000_000_000 { ts } else { ts * 1000 });
    }

    Err(DataError::ParseError(format!("Could not parse date: {}", value)))
}
