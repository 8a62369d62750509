//! Indicators: pure functions from candle history to a numeric series.
//!
//! Every indicator returns a `Vec<f64>` the same length as its input, with
//! `f64::NAN` for the warm-up bars.
//!
//! # Look-ahead contamination guard
//! No indicator value at bar t may depend on price data from bar t+1 or later.
//! Every indicator must pass the truncated-vs-full series test.

pub mod channel;
pub mod rsi;
pub mod sma;

pub use channel::{Channel, ChannelBand};
pub use rsi::Rsi;
pub use sma::Sma;

use crate::domain::Candle;

/// Trait for indicators.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_10", "rsi_14").
    fn name(&self) -> &str;

    /// Number of leading bars without a valid value.
    fn lookback(&self) -> usize;

    /// Compute the indicator over the whole candle slice.
    fn compute(&self, candles: &[Candle]) -> Vec<f64>;
}

/// Build candles from close prices for testing.
///
/// open = previous close (or close for the first bar),
/// high = max(open, close) + 1.0, low = min(open, close) - 1.0.
#[cfg(test)]
pub fn make_candles(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Candle {
                time: 1_700_000_000 + i as i64 * 3_600,
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
