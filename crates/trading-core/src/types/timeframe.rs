//! Timeframe definitions for market data.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Regular-session trading days per year.
const TRADING_DAYS_PER_YEAR: f64 = 252.0;
/// Regular-session minutes per trading day (09:30-16:00).
const SESSION_MINUTES: f64 = 390.0;

/// Timeframe for bars/candles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Timeframe {
    /// 1 minute bars
    #[serde(rename = "1m")]
    Minute1,
    /// 5 minute bars
    #[serde(rename = "5m")]
    Minute5,
    /// 15 minute bars
    #[serde(rename = "15m")]
    Minute15,
    /// 30 minute bars
    #[serde(rename = "30m")]
    Minute30,
    /// 1 hour bars
    #[serde(rename = "1h")]
    Hour1,
    /// Daily bars
    #[serde(rename = "1d")]
    #[default]
    Daily,
    /// Weekly bars
    #[serde(rename = "1w")]
    Weekly,
    /// Monthly bars
    #[serde(rename = "1M")]
    Monthly,
}

impl Timeframe {
    /// Number of bars in a trading year, used to annualize per-bar statistics.
    pub fn periods_per_year(&self) -> f64 {
        match self {
            Timeframe::Minute1 => TRADING_DAYS_PER_YEAR * SESSION_MINUTES,
            Timeframe::Minute5 => TRADING_DAYS_PER_YEAR * SESSION_MINUTES / 5.0,
            Timeframe::Minute15 => TRADING_DAYS_PER_YEAR * SESSION_MINUTES / 15.0,
            Timeframe::Minute30 => TRADING_DAYS_PER_YEAR * SESSION_MINUTES / 30.0,
            Timeframe::Hour1 => TRADING_DAYS_PER_YEAR * SESSION_MINUTES / 60.0,
            Timeframe::Daily => TRADING_DAYS_PER_YEAR,
            Timeframe::Weekly => 52.0,
            Timeframe::Monthly => 12.0,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Timeframe::Minute1 => "1m",
            Timeframe::Minute5 => "5m",
            Timeframe::Minute15 => "15m",
            Timeframe::Minute30 => "30m",
            Timeframe::Hour1 => "1h",
            Timeframe::Daily => "1d",
            Timeframe::Weekly => "1w",
            Timeframe::Monthly => "1M",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "1M" (month) must be matched before lowercasing collapses it into "1m".
        if s == "1M" {
            return Ok(Timeframe::Monthly);
        }
        match s.to_lowercase().as_str() {
            "1m" | "1min" | "minute" => Ok(Timeframe::Minute1),
            "5m" | "5min" => Ok(Timeframe::Minute5),
            "15m" | "15min" => Ok(Timeframe::Minute15),
            "30m" | "30min" => Ok(Timeframe::Minute30),
            "1h" | "1hour" | "hour" => Ok(Timeframe::Hour1),
            "1d" | "day" | "daily" => Ok(Timeframe::Daily),
            "1w" | "week" | "weekly" => Ok(Timeframe::Weekly),
            "month" | "monthly" => Ok(Timeframe::Monthly),
            _ => Err(format!("Invalid timeframe: {}", s)),
        }
    }
}
