//! Criterion benchmarks for StratLab hot paths.
//!
//! Benchmarks:
//! 1. Full engine run per variant
//! 2. Indicator computation (SMA, RSI, channel)
//! 3. Statistics over a long equity curve

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use stratlab_core::domain::{Candle, CandleSeries, StrategyConfig, StrategyVariant, Timeframe};
use stratlab_core::indicators::{Channel, Indicator, Rsi, Sma};
use stratlab_core::stats::{max_drawdown_pct, sharpe_ratio};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_candles(n: usize) -> Vec<Candle> {
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            let open = close - 0.3;
            Candle::new(i as i64 * 3_600, open, close + 1.5, open - 1.5, close)
        })
        .collect()
}

fn make_series(n: usize) -> CandleSeries {
    CandleSeries::try_new(make_candles(n)).unwrap()
}

// ── 1. Engine ────────────────────────────────────────────────────────

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_run");
    for n in [1_000, 10_000] {
        let series = make_series(n);
        for variant in StrategyVariant::ALL {
            let config =
                StrategyConfig::new("BENCH", Timeframe::OneHour, variant).with_exits(2.0, 5.0);
            group.bench_with_input(
                BenchmarkId::new(variant.as_str(), n),
                &series,
                |b, series| b.iter(|| stratlab_core::run(black_box(series), black_box(&config))),
            );
        }
    }
    group.finish();
}

// ── 2. Indicators ────────────────────────────────────────────────────

fn bench_indicators(c: &mut Criterion) {
    let candles = make_candles(10_000);
    let indicators: Vec<Box<dyn Indicator>> = vec![
        Box::new(Sma::new(30)),
        Box::new(Rsi::new(14)),
        Box::new(Channel::upper(20)),
    ];
    let mut group = c.benchmark_group("indicators");
    for indicator in &indicators {
        group.bench_function(indicator.name(), |b| {
            b.iter(|| indicator.compute(black_box(&candles)))
        });
    }
    group.finish();
}

// ── 3. Statistics ────────────────────────────────────────────────────

fn bench_stats(c: &mut Criterion) {
    let equity: Vec<f64> = (0..100_000)
        .map(|i| 1.0 + (i as f64 * 0.01).sin() * 0.1 + i as f64 * 1e-6)
        .collect();
    c.bench_function("sharpe_100k", |b| {
        b.iter(|| sharpe_ratio(black_box(&equity), 252.0))
    });
    c.bench_function("drawdown_100k", |b| {
        b.iter(|| max_drawdown_pct(black_box(&equity)))
    });
}

criterion_group!(benches, bench_engine, bench_indicators, bench_stats);
criterion_main!(benches);
