//! Simple Moving Average (SMA).
//!
//! Mean of close prices over a trailing window.
//! Lookback: period - 1 (first valid value at index period-1).
//!
//! The window mean is updated incrementally (`mean += (in - out) / period`)
//! rather than as `sum / period`, so a constant input yields exactly that
//! constant. Crossover detection depends on this: two SMAs of a flat market
//! must compare equal.

use super::Indicator;
use crate::domain::Candle;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        let n = candles.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period {
            return result;
        }

        // Seed with a running mean of the first window
        let mut mean = 0.0;
        for (k, candle) in candles.iter().take(self.period).enumerate() {
            mean += (candle.close - mean) / (k + 1) as f64;
        }
        result[self.period - 1] = mean;

        // Slide the window forward
        let p = self.period as f64;
        for i in self.period..n {
            let entering = candles[i].close;
            let leaving = candles[i - self.period].close;
            mean += (entering - leaving) / p;
            result[i] = mean;
        }

        result
    }
}
