//! Seeded synthetic candles for demos and tests.
//!
//! A random walk with a sinusoidal swing: each bar's base price moves from the
//! previous close by a wave term and uniform noise, then open and close
//! scatter around the base and wicks extend past the body. All terms are
//! relative to the running price, so every candle stays positive.
//!
//! These candles are clearly fake; runs that use them are tagged as synthetic.

use rand::Rng;
use serde::{Deserialize, Serialize};
use stratlab_core::domain::{Candle, Timeframe};
use stratlab_core::rng::SeedHierarchy;

/// Swing amplitude as a fraction of price.
const WAVE_AMPLITUDE: f64 = 0.0046;
/// Swing period divisor: the wave is `sin(i / WAVE_DIVISOR)`.
const WAVE_DIVISOR: f64 = 7.0;
/// Full width of the base-price noise.
const BASE_NOISE: f64 = 0.0023;
/// Full width of the open/close scatter around the base.
const BODY_NOISE: f64 = 0.00077;
/// Maximum wick length beyond the body.
const WICK: f64 = 0.0012;

/// Parameters of the synthetic supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticSpec {
    pub seed: u64,
    #[serde(default = "default_bars")]
    pub bars: usize,
    #[serde(default = "default_start_price")]
    pub start_price: f64,
    /// Open time of the last candle, unix seconds. `None` means now.
    #[serde(default)]
    pub end_time: Option<i64>,
}

fn default_bars() -> usize {
    301
}

fn default_start_price() -> f64 {
    65_000.0
}

impl SyntheticSpec {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            bars: default_bars(),
            start_price: default_start_price(),
            end_time: None,
        }
    }

    pub fn with_bars(mut self, bars: usize) -> Self {
        self.bars = bars;
        self
    }

    pub fn ending_at(mut self, end_time: i64) -> Self {
        self.end_time = Some(end_time);
        self
    }
}

/// Generate `spec.bars` candles spaced one `timeframe` step apart.
///
/// Prices depend only on `(seed, symbol, timeframe)`; times additionally on
/// `end_time`, which is aligned down to the step when taken from the clock.
pub fn generate(symbol: &str, timeframe: Timeframe, spec: &SyntheticSpec) -> Vec<Candle> {
    let step = timeframe.step_seconds();
    let end_time = spec.end_time.unwrap_or_else(|| {
        let now = chrono::Utc::now().timestamp();
        now - now.rem_euclid(step)
    });

    let key = format!("{symbol}/{timeframe}");
    let mut rng = SeedHierarchy::new(spec.seed).rng_for("synthetic", &key);
    let mut candles = Vec::with_capacity(spec.bars);
    let mut price = spec.start_price;

    for k in 0..spec.bars {
        let i = (spec.bars - 1 - k) as f64;
        let wave = (i / WAVE_DIVISOR).sin() * WAVE_AMPLITUDE;
        let base = price * (1.0 + wave + rng.gen_range(-0.5..0.5) * BASE_NOISE);
        let open = base * (1.0 + rng.gen_range(-0.5..0.5) * BODY_NOISE);
        let close = base * (1.0 + rng.gen_range(-0.5..0.5) * BODY_NOISE);
        let high = open.max(close) * (1.0 + rng.gen::<f64>() * WICK);
        let low = open.min(close) * (1.0 - rng.gen::<f64>() * WICK);

        let time = end_time - (spec.bars - 1 - k) as i64 * step;
        candles.push(Candle::new(time, open, high, low, close));
        price = close;
    }

    candles
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratlab_core::domain::CandleSeries;

    const END: i64 = 1_726_000_000;

    #[test]
    fn produces_requested_count_and_spacing() {
        let spec = SyntheticSpec::new(42).ending_at(END);
        let candles = generate("BTC", Timeframe::FiveMinutes, &spec);
        assert_eq!(candles.len(), 301);
        assert_eq!(candles.last().unwrap().time, END);
        assert!(candles.windows(2).all(|w| w[1].time - w[0].time == 300));
    }

    #[test]
    fn candles_form_a_valid_series() {
        let spec = SyntheticSpec::new(7).with_bars(2_000).ending_at(END);
        let candles = generate("ETH", Timeframe::OneHour, &spec);
        assert!(CandleSeries::try_new(candles).is_ok());
    }

    #[test]
    fn deterministic_per_seed_symbol_and_timeframe() {
        let spec = SyntheticSpec::new(42).ending_at(END);
        let a = generate("BTC", Timeframe::OneHour, &spec);
        let b = generate("BTC", Timeframe::OneHour, &spec);
        assert_eq!(a, b);

        let other_symbol = generate("ETH", Timeframe::OneHour, &spec);
        let other_seed = generate("BTC", Timeframe::OneHour, &SyntheticSpec::new(43).ending_at(END));
        let other_tf = generate("BTC", Timeframe::OneDay, &spec);
        assert_ne!(a[10].close, other_symbol[10].close);
        assert_ne!(a[10].close, other_seed[10].close);
        assert_ne!(a[10].close, other_tf[10].close);
    }

    #[test]
    fn stays_near_start_price() {
        let spec = SyntheticSpec::new(3).ending_at(END);
        let candles = generate("BTC", Timeframe::OneHour, &spec);
        for c in &candles {
            assert!(c.close > 65_000.0 * 0.5 && c.close < 65_000.0 * 1.5);
        }
    }

    #[test]
    fn zero_bars_is_empty() {
        let spec = SyntheticSpec::new(1).with_bars(0).ending_at(END);
        assert!(generate("BTC", Timeframe::OneHour, &spec).is_empty());
    }
}
