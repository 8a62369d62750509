//! RSI mean reversion: buy the oversold dip, exit on recovery.
//!
//! Long when RSI crosses below `oversold` from at-or-above it; held until RSI
//! crosses above `exit_level`, then Flat. Long-only.

use super::SignalGenerator;
use crate::domain::{Candle, Direction};
use crate::indicators::{Indicator, Rsi};

#[derive(Debug, Clone)]
pub struct RsiMeanReversion {
    pub period: usize,
    pub oversold: f64,
    pub exit_level: f64,
    rsi: Rsi,
}

impl RsiMeanReversion {
    pub fn new(period: usize, oversold: f64, exit_level: f64) -> Self {
        assert!(period >= 1, "period must be >= 1");
        assert!(
            exit_level > oversold,
            "exit_level must be above oversold"
        );
        Self {
            period,
            oversold,
            exit_level,
            rsi: Rsi::new(period),
        }
    }

    pub fn default_params() -> Self {
        Self::new(14, 30.0, 50.0)
    }
}

impl SignalGenerator for RsiMeanReversion {
    fn name(&self) -> &str {
        "rsi_mean_reversion"
    }

    fn warmup_bars(&self) -> usize {
        self.rsi.lookback()
    }

    fn directions(&self, candles: &[Candle]) -> Vec<Direction> {
        let rsi = self.rsi.compute(candles);
        let mut out = vec![Direction::Flat; candles.len()];

        let mut state = Direction::Flat;
        // The first RSI value has no predecessor, so no cross can complete on it.
        for i in (self.warmup_bars() + 1)..candles.len() {
            let (prev, cur) = (rsi[i - 1], rsi[i]);
            state = match state {
                Direction::Long if prev <= self.exit_level && cur > self.exit_level => {
                    Direction::Flat
                }
                Direction::Long => Direction::Long,
                _ if prev >= self.oversold && cur < self.oversold => Direction::Long,
                _ => Direction::Flat,
            };
            out[i] = state;
        }

        out
    }
}
