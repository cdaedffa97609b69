//! Backtest result and report generation.

use chrono::DateTime;
use csv::WriterBuilder;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use trading_core::error::TradingError;
use trading_core::types::{EquityPoint, ExitReason, IndicatorSeries, Trade};

use crate::{BacktestConfig, PerformanceSummary};

/// Complete output of one backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Instrument the run was simulated on
    pub symbol: String,
    /// Display name of the strategy
    pub strategy: String,
    /// Configuration used
    pub config: BacktestConfig,
    /// Statistics
    pub stats: PerformanceSummary,
    /// Closed trades in exit order
    pub trades: Vec<Trade>,
    /// One point per simulated bar
    pub equity_curve: Vec<EquityPoint>,
    /// Indicator series the strategy read, aligned with the input bars
    pub indicators: BTreeMap<String, IndicatorSeries>,
}

fn format_time(ms: Option<i64>) -> String {
    ms.and_then(DateTime::from_timestamp_millis)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

impl BacktestResult {
    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let stats = &self.stats;
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                     BACKTEST REPORT                        \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str(&format!("  Symbol:              {}\n", self.symbol));
        s.push_str(&format!("  Strategy:            {}\n", self.strategy));
        s.push_str(&format!(
            "  Period:              {} to {}\n\n",
            format_time(stats.start_time),
            format_time(stats.end_time)
        ));

        s.push_str("PERFORMANCE\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Initial Capital:     ${:.2}\n", stats.initial_cash));
        s.push_str(&format!("  Final Equity:        ${:.2}\n", stats.final_equity));
        s.push_str(&format!("  Total Return:        {:.2}%\n", stats.return_pct));
        s.push_str(&format!(
            "  Annualized Return:   {:.2}%\n",
            stats.annualized_return_pct
        ));
        s.push_str(&format!(
            "  Buy & Hold Return:   {:.2}%\n",
            stats.buy_and_hold_return_pct
        ));
        s.push_str(&format!("  Max Drawdown:        {:.2}%\n", stats.max_drawdown_pct));
        s.push_str(&format!(
            "  Max DD Duration:     {} bars\n",
            stats.max_drawdown_duration
        ));
        s.push_str(&format!("  Exposure:            {:.2}%\n\n", stats.exposure_pct));

        s.push_str("RISK METRICS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Sharpe Ratio:        {:.2}\n", stats.sharpe_ratio));
        s.push_str(&format!("  Sortino Ratio:       {:.2}\n", stats.sortino_ratio));
        s.push_str(&format!("  Profit Factor:       {:.2}\n\n", stats.profit_factor));

        s.push_str("TRADE STATISTICS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Total Trades:        {}\n", stats.total_trades));
        s.push_str(&format!("  Winning Trades:      {}\n", stats.winning_trades));
        s.push_str(&format!("  Losing Trades:       {}\n", stats.losing_trades));
        s.push_str(&format!("  Win Rate:            {:.2}%\n", stats.win_rate_pct));
        s.push_str(&format!("  Best Trade:          {:.2}%\n", stats.best_trade_pct));
        s.push_str(&format!("  Worst Trade:         {:.2}%\n", stats.worst_trade_pct));
        s.push_str(&format!("  Avg Trade:           {:.2}%\n", stats.avg_trade_pct));
        s.push_str(&format!("  Avg Win:             ${:.2}\n", stats.avg_win));
        s.push_str(&format!("  Avg Loss:            ${:.2}\n", stats.avg_loss));
        s.push_str(&format!("  Avg Bars Held:       {:.1}\n", stats.avg_bars_held));
        s.push_str(&format!(
            "  Commission Paid:     ${:.2}\n\n",
            stats.total_commission
        ));

        s.push_str("EXECUTION\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Bars Simulated:      {}\n", stats.bars_simulated));
        s.push_str(&format!(
            "  Equity Points:       {}\n\n",
            self.equity_curve.len()
        ));

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export the equity curve to CSV.
    pub fn equity_to_csv(&self) -> Result<String, TradingError> {
        write_csv(&["timestamp", "equity", "in_market"], &self.equity_curve)
    }

    /// Export the trade log to CSV.
    pub fn trades_to_csv(&self) -> Result<String, TradingError> {
        let rows: Vec<TradeRow> = self.trades.iter().map(TradeRow::from).collect();
        write_csv(&TradeRow::HEADER, &rows)
    }
}

/// Flat trade record as written to CSV.
#[derive(Serialize)]
struct TradeRow {
    entry_index: usize,
    exit_index: usize,
    entry_time: i64,
    exit_time: i64,
    entry_price: Decimal,
    exit_price: Decimal,
    size: u64,
    pnl: Decimal,
    return_pct: Decimal,
    commission: Decimal,
    exit_reason: ExitReason,
}

impl TradeRow {
    const HEADER: [&'static str; 11] = [
        "entry_index",
        "exit_index",
        "entry_time",
        "exit_time",
        "entry_price",
        "exit_price",
        "size",
        "pnl",
        "return_pct",
        "commission",
        "exit_reason",
    ];
}

impl From<&Trade> for TradeRow {
    fn from(t: &Trade) -> Self {
        Self {
            entry_index: t.entry_index,
            exit_index: t.exit_index,
            entry_time: t.entry_time,
            exit_time: t.exit_time,
            entry_price: t.entry_price,
            exit_price: t.exit_price,
            size: t.size,
            pnl: t.pnl,
            return_pct: t.return_pct.round_dp(4),
            commission: t.commission,
            exit_reason: t.exit_reason,
        }
    }
}

/// The header row is written even when `rows` is empty.
fn write_csv<T: Serialize>(header: &[&str], rows: &[T]) -> Result<String, TradingError> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(vec![]);
    wtr.write_record(header).map_err(csv_error)?;
    for row in rows {
        wtr.serialize(row).map_err(csv_error)?;
    }
    let data = wtr
        .into_inner()
        .map_err(|e| TradingError::Io(e.into_error()))?;
    String::from_utf8(data).map_err(|e| TradingError::Serialization(e.to_string()))
}

fn csv_error(err: csv::Error) -> TradingError {
    TradingError::Serialization(err.to_string())
}

/// Side-by-side table of several runs over the same data.
pub fn comparison_table(results: &[BacktestResult]) -> String {
    let mut s = String::new();
    s.push_str(&format!(
        "{:<18} {:>10} {:>8} {:>10} {:>9} {:>7}\n",
        "Strategy", "Return %", "Sharpe", "Max DD %", "Win Rate", "Trades"
    ));
    s.push_str("───────────────────────────────────────────────────────────────────\n");
    for result in results {
        let stats = &result.stats;
        s.push_str(&format!(
            "{:<18} {:>10.2} {:>8.2} {:>10.2} {:>8.2}% {:>7}\n",
            result.strategy,
            stats.return_pct,
            stats.sharpe_ratio,
            stats.max_drawdown_pct,
            stats.win_rate_pct,
            stats.total_trades
        ));
    }
    s
}
