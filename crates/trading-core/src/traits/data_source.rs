//! Data source trait definitions.

use crate::error::DataError;
use crate::types::{BarSeries, Timeframe};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Trait for historical data sources.
///
/// Implementations return one instrument's bars in ascending timestamp
/// order; the simulator never fetches data itself.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch historical bars.
    ///
    /// # Arguments
    /// * `symbol` - The symbol to fetch
    /// * `timeframe` - The bar timeframe
    /// * `start` - Inclusive start of the date range (unbounded if `None`)
    /// * `end` - Inclusive end of the date range (unbounded if `None`)
    async fn get_historical_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<BarSeries, DataError>;

    /// Get the name of this data source.
    fn name(&self) -> &str;
}
