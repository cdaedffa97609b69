//! Backtesting engine.
//!
//! Runs one strategy over one instrument's bar series, bar by bar, and
//! aggregates the resulting trades and equity curve into performance
//! statistics.

mod engine;
mod report;
mod statistics;

pub use engine::{run_many, BacktestConfig, BacktestEngine};
pub use report::{comparison_table, BacktestResult};
pub use statistics::{
    bar_returns, max_drawdown, sharpe_ratio, sortino_ratio, total_return_pct, win_rate_pct,
    PerformanceAnalyzer, PerformanceSummary,
};
