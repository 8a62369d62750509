//! Property tests for engine invariants.
//!
//! Uses proptest to verify, for arbitrary valid candle series:
//! 1. Alignment: equity, positions and signals have one entry per candle
//! 2. Bounds: drawdown in [-100, 0], win rate in [0, 1]
//! 3. Buy-and-hold: last point equals last close / first close
//! 4. Exits: stop-loss trades never exit above the stop price

use proptest::prelude::*;
use stratlab_core::domain::{
    Candle, CandleSeries, ExitReason, StrategyConfig, StrategyVariant, Timeframe,
};
use stratlab_core::run;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_variant() -> impl Strategy<Value = StrategyVariant> {
    prop_oneof![
        Just(StrategyVariant::SmaCross),
        Just(StrategyVariant::Breakout),
        Just(StrategyVariant::RsiMeanReversion),
    ]
}

/// Multiplicative random walk; every candle satisfies the OHLC invariant.
fn arb_series() -> impl Strategy<Value = CandleSeries> {
    prop::collection::vec((-0.05..0.05_f64, 0.0..0.02_f64, 0.0..0.02_f64), 0..250).prop_map(
        |steps| {
            let mut prev = 100.0_f64;
            let candles = steps
                .into_iter()
                .enumerate()
                .map(|(i, (ret, up, down))| {
                    let open = prev;
                    let close = prev * (1.0 + ret);
                    prev = close;
                    Candle::new(
                        i as i64 * 60,
                        open,
                        open.max(close) * (1.0 + up),
                        open.min(close) * (1.0 - down),
                        close,
                    )
                })
                .collect();
            CandleSeries::try_new(candles).expect("generated candles are valid")
        },
    )
}

fn arb_pct() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.0), 0.5..10.0_f64]
}

proptest! {
    #[test]
    fn outputs_align_with_candles(
        series in arb_series(),
        variant in arb_variant(),
        risk in arb_pct(),
        target in arb_pct(),
    ) {
        let config = StrategyConfig::new("TEST", Timeframe::OneHour, variant).with_exits(risk, target);
        let out = run(&series, &config);
        prop_assert_eq!(out.strategy_equity.len(), series.len());
        prop_assert_eq!(out.benchmark_equity.len(), series.len());
        prop_assert_eq!(out.positions.len(), series.len());
        prop_assert_eq!(out.signals.len(), series.len());
        if let Some(first) = out.strategy_equity.first() {
            prop_assert_eq!(first.value, 1.0);
        }
    }

    #[test]
    fn stats_stay_in_bounds(
        series in arb_series(),
        variant in arb_variant(),
        risk in arb_pct(),
        target in arb_pct(),
    ) {
        let config = StrategyConfig::new("TEST", Timeframe::OneDay, variant).with_exits(risk, target);
        let out = run(&series, &config);
        for stats in [out.strategy_stats, out.benchmark_stats] {
            prop_assert!((-100.0..=0.0).contains(&stats.max_drawdown_pct));
            prop_assert!((0.0..=1.0).contains(&stats.win_rate));
            prop_assert!(stats.sharpe.is_finite());
            prop_assert!(stats.pnl_pct.is_finite());
        }
    }

    #[test]
    fn buy_and_hold_ends_at_price_ratio(series in arb_series()) {
        let out = run(&series, &StrategyConfig::default());
        if let (Some(first), Some(last), Some(point)) =
            (series.first(), series.last(), out.benchmark_equity.last())
        {
            prop_assert!((point.value - last.close / first.close).abs() < 1e-9);
        }
    }

    #[test]
    fn stop_exits_fill_at_stop_price(
        series in arb_series(),
        variant in arb_variant(),
        risk in 0.5..5.0_f64,
    ) {
        let config = StrategyConfig::new("TEST", Timeframe::OneHour, variant).with_exits(risk, 0.0);
        let out = run(&series, &config);
        for trade in out.trades.iter().filter(|t| t.exit_reason == ExitReason::StopLoss) {
            let stop = trade.entry_price * (1.0 - risk / 100.0);
            prop_assert!((trade.exit_price - stop).abs() < 1e-9);
            prop_assert!(trade.exit_index > trade.entry_index);
        }
    }
}
