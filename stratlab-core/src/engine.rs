//! Engine entry point: one strategy over one candle series.
//!
//! `run` wires the pipeline together:
//! signals → simulator → strategy stats, and independently
//! buy-and-hold → benchmark stats. It holds no state between calls.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::benchmark::buy_and_hold;
use crate::domain::{
    CandleSeries, ClosedTrade, Direction, EquityPoint, ExitReason, Signal, StrategyConfig,
};
use crate::signals::generate_signals;
use crate::simulator::{simulate, ExitRules};
use crate::stats::Stats;

/// Everything a single engine run produces.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineOutput {
    pub signals: Vec<Signal>,
    pub positions: Vec<Direction>,
    pub strategy_equity: Vec<EquityPoint>,
    pub benchmark_equity: Vec<EquityPoint>,
    pub strategy_stats: Stats,
    pub benchmark_stats: Stats,
    pub trades: Vec<ClosedTrade>,
}

impl EngineOutput {
    /// Strategy equity at the last bar; 1.0 for an empty run.
    pub fn final_equity(&self) -> f64 {
        crate::domain::equity::final_value(&self.strategy_equity)
    }
}

/// Run `config` over `series`.
///
/// An empty series yields empty curves and all-zero stats.
pub fn run(series: &CandleSeries, config: &StrategyConfig) -> EngineOutput {
    let signals = generate_signals(series, config.variant);
    let rules = ExitRules::from_pcts(config.risk_pct, config.target_pct);
    let sim = simulate(series, &signals, rules);
    let strategy_stats = Stats::compute(&sim.equity, &sim.trades, config.timeframe);

    let benchmark_equity = buy_and_hold(series);
    let round_trip: Vec<ClosedTrade> = holding_trade(series).into_iter().collect();
    let benchmark_stats = Stats::compute(&benchmark_equity, &round_trip, config.timeframe);

    debug!(
        symbol = %config.symbol,
        variant = %config.variant,
        bars = series.len(),
        trades = sim.trades.len(),
        pnl_pct = strategy_stats.pnl_pct,
        benchmark_pnl_pct = benchmark_stats.pnl_pct,
        "engine run complete"
    );

    EngineOutput {
        signals,
        positions: sim.positions,
        strategy_equity: sim.equity,
        benchmark_equity,
        strategy_stats,
        benchmark_stats,
        trades: sim.trades,
    }
}

/// Buy-and-hold as a single round trip from the first close to the last.
fn holding_trade(series: &CandleSeries) -> Option<ClosedTrade> {
    let (first, last) = (series.first()?, series.last()?);
    if series.len() < 2 {
        return None;
    }
    Some(ClosedTrade {
        entry_index: 0,
        entry_time: first.time,
        entry_price: first.close,
        exit_index: series.len() - 1,
        exit_time: last.time,
        exit_price: last.close,
        exit_reason: ExitReason::Signal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{StrategyVariant, Timeframe};
    use crate::indicators::make_candles;

    fn series(closes: &[f64]) -> CandleSeries {
        CandleSeries::try_new(make_candles(closes)).unwrap()
    }

    #[test]
    fn empty_series_gives_empty_output() {
        let out = run(&CandleSeries::empty(), &StrategyConfig::default());
        assert!(out.signals.is_empty());
        assert!(out.strategy_equity.is_empty());
        assert!(out.benchmark_equity.is_empty());
        assert_eq!(out.strategy_stats, Stats::default());
        assert_eq!(out.benchmark_stats, Stats::default());
        assert_eq!(out.final_equity(), 1.0);
    }

    #[test]
    fn final_equity_matches_pnl() {
        let closes: Vec<f64> = (0..120).map(|i| 100.0 + (i as f64 / 7.0).sin() * 8.0).collect();
        let out = run(&series(&closes), &StrategyConfig::default());
        let last = out.strategy_equity.last().unwrap().value;
        assert_eq!(out.final_equity(), last);
        assert!(((last - 1.0) * 100.0 - out.strategy_stats.pnl_pct).abs() < 1e-9);
    }

    #[test]
    fn outputs_are_aligned() {
        let closes: Vec<f64> = (0..120).map(|i| 100.0 + (i as f64 / 7.0).sin() * 8.0).collect();
        let s = series(&closes);
        for variant in StrategyVariant::ALL {
            let config = StrategyConfig::default().with_variant(variant);
            let out = run(&s, &config);
            assert_eq!(out.signals.len(), s.len());
            assert_eq!(out.positions.len(), s.len());
            assert_eq!(out.strategy_equity.len(), s.len());
            assert_eq!(out.benchmark_equity.len(), s.len());
            assert_eq!(out.strategy_equity[0].value, 1.0);
        }
    }

    #[test]
    fn benchmark_win_rate_reflects_direction() {
        let up = run(&series(&[100.0, 101.0, 103.0]), &StrategyConfig::default());
        assert_eq!(up.benchmark_stats.win_rate, 1.0);
        assert!((up.benchmark_stats.pnl_pct - 3.0).abs() < 1e-9);

        let down = run(&series(&[100.0, 99.0, 97.0]), &StrategyConfig::default());
        assert_eq!(down.benchmark_stats.win_rate, 0.0);
        assert!(down.benchmark_stats.max_drawdown_pct < 0.0);
    }

    #[test]
    fn single_candle_has_zero_stats() {
        let out = run(&series(&[100.0]), &StrategyConfig::default());
        assert_eq!(out.benchmark_equity.len(), 1);
        assert_eq!(out.benchmark_stats, Stats::default());
    }

    #[test]
    fn run_is_deterministic() {
        let closes: Vec<f64> = (0..200).map(|i| 50.0 + (i as f64 * 0.2).cos() * 4.0).collect();
        let s = series(&closes);
        let config = StrategyConfig::new("ETH", Timeframe::OneDay, StrategyVariant::Breakout)
            .with_exits(1.0, 3.0);
        let a = run(&s, &config);
        let b = run(&s, &config);
        assert_eq!(a.strategy_equity, b.strategy_equity);
        assert_eq!(a.trades, b.trades);
        assert_eq!(a.strategy_stats, b.strategy_stats);
    }
}
