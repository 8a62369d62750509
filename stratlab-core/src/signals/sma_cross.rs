//! Moving average crossover: long on a golden cross, flat on a death cross.
//!
//! Long from the bar where the fast SMA crosses above the slow SMA; held
//! until the fast SMA drops below the slow SMA. Long-only.

use super::SignalGenerator;
use crate::domain::{Candle, Direction};
use crate::indicators::{Indicator, Sma};

#[derive(Debug, Clone)]
pub struct SmaCross {
    fast: Sma,
    slow: Sma,
}

impl SmaCross {
    pub fn new(fast_period: usize, slow_period: usize) -> Self {
        assert!(fast_period >= 1, "fast_period must be >= 1");
        assert!(
            slow_period > fast_period,
            "slow_period must be > fast_period"
        );
        Self {
            fast: Sma::new(fast_period),
            slow: Sma::new(slow_period),
        }
    }

    pub fn default_params() -> Self {
        Self::new(10, 30)
    }
}

impl SignalGenerator for SmaCross {
    fn name(&self) -> &str {
        "sma_cross"
    }

    fn warmup_bars(&self) -> usize {
        self.slow.lookback()
    }

    fn directions(&self, candles: &[Candle]) -> Vec<Direction> {
        let fast = self.fast.compute(candles);
        let slow = self.slow.compute(candles);
        let mut out = vec![Direction::Flat; candles.len()];

        // NaN comparisons are false, so an undefined prior SMA reads as "not above".
        let above = |i: usize| fast[i] > slow[i];
        let below = |i: usize| fast[i] < slow[i];

        let mut state = Direction::Flat;
        for i in self.warmup_bars()..candles.len() {
            state = match state {
                Direction::Long if below(i) => Direction::Flat,
                Direction::Long => Direction::Long,
                _ if above(i) && (i == 0 || !above(i - 1)) => Direction::Long,
                _ => Direction::Flat,
            };
            out[i] = state;
        }

        out
    }
}
