//! Property tests for simulation invariants.
//!
//! Uses proptest to verify, over random price paths and configurations:
//! 1. Equity curve length equals the number of simulated bars
//! 2. Exclusive orders: trades never overlap and each lasts at least one bar
//! 3. Cash accounting: realized P&L sums to the change in cash
//! 4. Bounded statistics: drawdown and win rate stay within [0, 100]
//! 5. Determinism: the same inputs give the same result

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use trading_backtest::{run_many, BacktestConfig, BacktestEngine};
use trading_core::traits::SignalRule;
use trading_core::types::{Bar, BarSeries, Timeframe};
use trading_risk::RiskConfig;
use trading_strategies::{
    BollingerConfig, MACrossoverConfig, MacdConfig, RsiConfig, SignalEvaluator, StrategyParams,
};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_series() -> impl Strategy<Value = BarSeries> {
    prop::collection::vec((-0.04..0.04_f64, 0.0..0.03_f64), 40..160).prop_map(|moves| {
        let mut close = 100.0_f64;
        let bars = moves
            .iter()
            .enumerate()
            .map(|(i, &(ret, spread))| {
                let open = close;
                close = ((close * (1.0 + ret)) * 100.0).round() / 100.0;
                let high = ((open.max(close) * (1.0 + spread)) * 100.0).round() / 100.0;
                let low = ((open.min(close) * (1.0 - spread)) * 100.0).round() / 100.0;
                Bar::new(i as i64 * 86_400_000, open, high, low, close, 1000.0)
            })
            .collect();
        BarSeries::new("PROP", Timeframe::Daily, bars).unwrap()
    })
}

fn arb_strategy() -> impl Strategy<Value = StrategyParams> {
    prop_oneof![
        (2..8usize, 8..20usize).prop_map(|(fast, slow)| {
            StrategyParams::MaCrossover(MACrossoverConfig {
                fast_period: fast,
                slow_period: slow,
            })
        }),
        (2..15usize, 55.0..80.0_f64, 20.0..45.0_f64).prop_map(|(period, ob, os)| {
            StrategyParams::Rsi(RsiConfig {
                period,
                overbought: ob,
                oversold: os,
                ..Default::default()
            })
        }),
        (2..8usize, 10..20usize, 2..8usize).prop_map(|(fast, slow, signal)| {
            StrategyParams::Macd(MacdConfig {
                fast_period: fast,
                slow_period: slow,
                signal_period: signal,
            })
        }),
        (5..20usize, 1.0..2.5_f64).prop_map(|(period, std_dev)| {
            StrategyParams::Bollinger(BollingerConfig { period, std_dev })
        }),
    ]
}

fn arb_config() -> impl Strategy<Value = BacktestConfig> {
    (arb_strategy(), 0..15u32, 0..25u32, 10..=100u32).prop_map(|(strategy, sl, tp, size)| {
        BacktestConfig {
            strategy,
            risk: RiskConfig {
                stop_loss_pct: Decimal::from(sl),
                take_profit_pct: Decimal::from(tp),
                position_size_pct: Decimal::from(size),
                ..Default::default()
            },
            initial_cash: dec!(100000),
            timeframe: None,
        }
    })
}

// ── Invariants ───────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// One equity point per bar from the warm-up index to the end.
    #[test]
    fn equity_curve_covers_simulated_bars(series in arb_series(), config in arb_config()) {
        let evaluator = SignalEvaluator::build(&config.strategy, &series.closes()).unwrap();
        let warmup = evaluator.warmup_period();

        let result = BacktestEngine::new(config).unwrap().run(&series).unwrap();
        prop_assert_eq!(result.equity_curve.len(), series.len() - warmup);
        prop_assert_eq!(result.stats.bars_simulated, series.len() - warmup);
    }

    /// Trades never overlap, and the in-market flag matches the trade log.
    #[test]
    fn at_most_one_open_position(series in arb_series(), config in arb_config()) {
        let result = BacktestEngine::new(config).unwrap().run(&series).unwrap();

        let mut previous_exit = 0;
        for trade in &result.trades {
            prop_assert!(trade.entry_index >= previous_exit);
            prop_assert!(trade.exit_index > trade.entry_index);
            prop_assert!(trade.size > 0);
            previous_exit = trade.exit_index;
        }

        let held: usize = result.trades.iter().map(|t| t.bars_held()).sum();
        let in_market = result.equity_curve.iter().filter(|p| p.in_market).count();
        prop_assert_eq!(held, in_market);
        prop_assert!(!result.equity_curve.last().unwrap().in_market);
    }

    /// Realized P&L accounts for every change in cash.
    #[test]
    fn pnl_sums_to_cash_change(series in arb_series(), config in arb_config()) {
        let initial = config.initial_cash;
        let rate = config.risk.commission_rate;
        let result = BacktestEngine::new(config).unwrap().run(&series).unwrap();

        let total: Decimal = result.trades.iter().map(|t| t.pnl).sum();
        prop_assert_eq!(total, result.stats.final_equity - initial);

        for trade in &result.trades {
            let size = Decimal::from(trade.size);
            let expected = (trade.exit_price - trade.entry_price) * size
                - rate * (trade.entry_price * size + trade.exit_price * size);
            prop_assert_eq!(trade.pnl, expected);
        }
    }

    /// Percentages stay in range.
    #[test]
    fn statistics_are_bounded(series in arb_series(), config in arb_config()) {
        let stats = BacktestEngine::new(config).unwrap().run(&series).unwrap().stats;

        prop_assert!(stats.max_drawdown_pct >= Decimal::ZERO);
        prop_assert!(stats.max_drawdown_pct <= dec!(100));
        prop_assert!(stats.win_rate_pct >= Decimal::ZERO);
        prop_assert!(stats.win_rate_pct <= dec!(100));
        prop_assert!(stats.exposure_pct <= dec!(100));
        prop_assert!(stats.sharpe_ratio.is_finite());
        if stats.total_trades == 0 {
            prop_assert_eq!(stats.win_rate_pct, Decimal::ZERO);
        }
    }

    /// Parallel runs match sequential runs, in order.
    #[test]
    fn runs_are_deterministic(series in arb_series(), a in arb_config(), b in arb_config()) {
        let configs = vec![a.clone(), b];
        let parallel = run_many(&series, &configs);
        let sequential = BacktestEngine::new(a).unwrap().run(&series).unwrap();

        let first = parallel[0].as_ref().unwrap();
        prop_assert_eq!(&first.trades, &sequential.trades);
        prop_assert_eq!(&first.equity_curve, &sequential.equity_curve);
        prop_assert_eq!(&first.stats, &sequential.stats);
    }
}
