//! Backtest statistics.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use trading_core::types::{EquityPoint, Timeframe, Trade};

/// Summary statistics for one completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// Initial capital
    pub initial_cash: Decimal,
    /// Final equity
    pub final_equity: Decimal,
    /// Total return percentage
    pub return_pct: Decimal,
    /// Annualized return percentage
    pub annualized_return_pct: Decimal,
    /// Close-to-close return of the whole series, in percent
    pub buy_and_hold_return_pct: Decimal,
    /// Maximum drawdown percentage
    pub max_drawdown_pct: Decimal,
    /// Longest stretch of bars spent below a prior equity peak
    pub max_drawdown_duration: usize,
    /// Sharpe ratio (risk-free rate of 0)
    pub sharpe_ratio: f64,
    /// Sortino ratio (risk-free rate of 0)
    pub sortino_ratio: f64,
    /// Share of simulated bars with an open position, in percent
    pub exposure_pct: Decimal,
    /// Total number of trades
    pub total_trades: usize,
    /// Number of winning trades
    pub winning_trades: usize,
    /// Number of losing trades
    pub losing_trades: usize,
    /// Win rate percentage
    pub win_rate_pct: Decimal,
    pub best_trade_pct: Decimal,
    pub worst_trade_pct: Decimal,
    pub avg_trade_pct: Decimal,
    /// Average profit per winning trade
    pub avg_win: Decimal,
    /// Average loss per losing trade (positive)
    pub avg_loss: Decimal,
    /// Gross profit / gross loss; 0 without losing trades
    pub profit_factor: Decimal,
    pub avg_bars_held: f64,
    /// Commission paid across all fills
    pub total_commission: Decimal,
    /// Number of equity points produced
    pub bars_simulated: usize,
    /// Unix milliseconds of the first simulated bar
    pub start_time: Option<i64>,
    /// Unix milliseconds of the last simulated bar
    pub end_time: Option<i64>,
}

/// Aggregates an equity curve and trade log into a [`PerformanceSummary`].
#[derive(Debug, Clone)]
pub struct PerformanceAnalyzer {
    initial_cash: Decimal,
    periods_per_year: f64,
}

impl PerformanceAnalyzer {
    pub fn new(initial_cash: Decimal, timeframe: Timeframe) -> Self {
        Self {
            initial_cash,
            periods_per_year: timeframe.periods_per_year(),
        }
    }

    /// Compute every statistic.
    ///
    /// `first_close` and `last_close` span the whole input series and feed
    /// the buy-and-hold comparison.
    pub fn analyze(
        &self,
        equity: &[EquityPoint],
        trades: &[Trade],
        first_close: f64,
        last_close: f64,
    ) -> PerformanceSummary {
        let final_equity = equity
            .last()
            .map(|p| p.equity)
            .unwrap_or(self.initial_cash);
        let returns = bar_returns(equity);
        let (max_drawdown_pct, max_drawdown_duration) = max_drawdown(equity);

        let trade_stats = TradeStats::from_trades(trades);

        PerformanceSummary {
            initial_cash: self.initial_cash,
            final_equity,
            return_pct: total_return_pct(self.initial_cash, final_equity),
            annualized_return_pct: annualized_return_pct(
                self.initial_cash,
                final_equity,
                equity.len(),
                self.periods_per_year,
            ),
            buy_and_hold_return_pct: buy_and_hold_pct(first_close, last_close),
            max_drawdown_pct,
            max_drawdown_duration,
            sharpe_ratio: sharpe_ratio(&returns, self.periods_per_year),
            sortino_ratio: sortino_ratio(&returns, self.periods_per_year),
            exposure_pct: exposure_pct(equity),
            total_trades: trades.len(),
            winning_trades: trade_stats.winning,
            losing_trades: trade_stats.losing,
            win_rate_pct: win_rate_pct(trades),
            best_trade_pct: trade_stats.best_pct,
            worst_trade_pct: trade_stats.worst_pct,
            avg_trade_pct: trade_stats.avg_pct,
            avg_win: trade_stats.avg_win,
            avg_loss: trade_stats.avg_loss,
            profit_factor: trade_stats.profit_factor,
            avg_bars_held: trade_stats.avg_bars_held,
            total_commission: trade_stats.total_commission,
            bars_simulated: equity.len(),
            start_time: equity.first().map(|p| p.timestamp),
            end_time: equity.last().map(|p| p.timestamp),
        }
    }
}

/// `(final - initial) / initial * 100`; 0 for a non-positive initial value.
pub fn total_return_pct(initial: Decimal, final_equity: Decimal) -> Decimal {
    if initial <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (final_equity - initial) / initial * dec!(100)
}

fn annualized_return_pct(
    initial: Decimal,
    final_equity: Decimal,
    bars: usize,
    periods_per_year: f64,
) -> Decimal {
    if bars == 0 || initial <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let growth = (final_equity / initial).to_f64().unwrap_or(1.0);
    if growth <= 0.0 {
        return dec!(-100);
    }
    let annualized = (growth.powf(periods_per_year / bars as f64) - 1.0) * 100.0;
    Decimal::from_f64(annualized).unwrap_or(Decimal::ZERO)
}

fn buy_and_hold_pct(first_close: f64, last_close: f64) -> Decimal {
    if first_close <= 0.0 {
        return Decimal::ZERO;
    }
    Decimal::from_f64((last_close - first_close) / first_close * 100.0).unwrap_or(Decimal::ZERO)
}

/// Bar-over-bar simple returns of the equity curve.
pub fn bar_returns(equity: &[EquityPoint]) -> Vec<f64> {
    equity
        .windows(2)
        .filter_map(|pair| {
            let prev = pair[0].equity_f64();
            (prev > 0.0).then(|| pair[1].equity_f64() / prev - 1.0)
        })
        .collect()
}

/// `mean / sample std * sqrt(periods_per_year)`.
///
/// Zero when there are fewer than two returns or the returns do not vary.
pub fn sharpe_ratio(returns: &[f64], periods_per_year: f64) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let mean = returns.iter().mean();
    let std_dev = returns.iter().std_dev();
    if !(std_dev.is_finite() && std_dev > 0.0) {
        return 0.0;
    }
    mean / std_dev * periods_per_year.sqrt()
}

/// Like [`sharpe_ratio`] but divides by the downside deviation.
pub fn sortino_ratio(returns: &[f64], periods_per_year: f64) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let mean = returns.iter().mean();
    let downside_variance = returns
        .iter()
        .map(|r| r.min(0.0).powi(2))
        .sum::<f64>()
        / returns.len() as f64;
    let downside_dev = downside_variance.sqrt();
    if downside_dev > 0.0 {
        mean / downside_dev * periods_per_year.sqrt()
    } else {
        0.0
    }
}

/// Maximum peak-to-trough decline in percent, and the longest run of bars
/// spent below a previous peak.
///
/// The running peak starts at the first equity point and never decreases.
pub fn max_drawdown(equity: &[EquityPoint]) -> (Decimal, usize) {
    let Some(first) = equity.first() else {
        return (Decimal::ZERO, 0);
    };

    let mut peak = first.equity;
    let mut max_dd = Decimal::ZERO;
    let mut duration = 0;
    let mut max_duration = 0;

    for point in equity {
        if point.equity >= peak {
            peak = point.equity;
            duration = 0;
            continue;
        }

        duration += 1;
        max_duration = max_duration.max(duration);

        if peak > Decimal::ZERO {
            let dd = (peak - point.equity) / peak * dec!(100);
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    (max_dd, max_duration)
}

/// Winning trades over all trades, in percent; 0 with no trades.
pub fn win_rate_pct(trades: &[Trade]) -> Decimal {
    if trades.is_empty() {
        return Decimal::ZERO;
    }
    let wins = trades.iter().filter(|t| t.is_win()).count();
    Decimal::from(wins) / Decimal::from(trades.len()) * dec!(100)
}

fn exposure_pct(equity: &[EquityPoint]) -> Decimal {
    if equity.is_empty() {
        return Decimal::ZERO;
    }
    let held = equity.iter().filter(|p| p.in_market).count();
    Decimal::from(held) / Decimal::from(equity.len()) * dec!(100)
}

#[derive(Default)]
struct TradeStats {
    winning: usize,
    losing: usize,
    best_pct: Decimal,
    worst_pct: Decimal,
    avg_pct: Decimal,
    avg_win: Decimal,
    avg_loss: Decimal,
    profit_factor: Decimal,
    avg_bars_held: f64,
    total_commission: Decimal,
}

impl TradeStats {
    fn from_trades(trades: &[Trade]) -> Self {
        if trades.is_empty() {
            return Self::default();
        }

        let mut stats = Self {
            best_pct: trades[0].return_pct,
            worst_pct: trades[0].return_pct,
            ..Default::default()
        };
        let mut gross_profit = Decimal::ZERO;
        let mut gross_loss = Decimal::ZERO;
        let mut pct_sum = Decimal::ZERO;
        let mut bars_held = 0usize;

        for trade in trades {
            if trade.is_win() {
                stats.winning += 1;
                gross_profit += trade.pnl;
            } else if trade.is_loss() {
                stats.losing += 1;
                gross_loss += trade.pnl.abs();
            }
            stats.best_pct = stats.best_pct.max(trade.return_pct);
            stats.worst_pct = stats.worst_pct.min(trade.return_pct);
            pct_sum += trade.return_pct;
            bars_held += trade.bars_held();
            stats.total_commission += trade.commission;
        }

        let count = Decimal::from(trades.len());
        stats.avg_pct = pct_sum / count;
        stats.avg_bars_held = bars_held as f64 / trades.len() as f64;

        if stats.winning > 0 {
            stats.avg_win = gross_profit / Decimal::from(stats.winning);
        }
        if stats.losing > 0 {
            stats.avg_loss = gross_loss / Decimal::from(stats.losing);
        }
        if gross_loss > Decimal::ZERO {
            stats.profit_factor = gross_profit / gross_loss;
        }

        stats
    }
}
