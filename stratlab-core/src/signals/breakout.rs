//! Channel breakout: long on a new N-bar high close, flat on a new N-bar low close.
//!
//! Long when close > max(high) of the previous `lookback` bars; Flat when
//! close < min(low) of the previous `lookback` bars; otherwise the previous
//! directive is held.

use super::SignalGenerator;
use crate::domain::{Candle, Direction};
use crate::indicators::{Channel, Indicator};

#[derive(Debug, Clone)]
pub struct Breakout {
    pub lookback: usize,
    upper: Channel,
    lower: Channel,
}

impl Breakout {
    pub fn new(lookback: usize) -> Self {
        assert!(lookback >= 1, "lookback must be >= 1");
        Self {
            lookback,
            upper: Channel::upper(lookback),
            lower: Channel::lower(lookback),
        }
    }

    pub fn default_params() -> Self {
        Self::new(20)
    }
}

impl SignalGenerator for Breakout {
    fn name(&self) -> &str {
        "breakout"
    }

    fn warmup_bars(&self) -> usize {
        self.lookback
    }

    fn directions(&self, candles: &[Candle]) -> Vec<Direction> {
        let upper = self.upper.compute(candles);
        let lower = self.lower.compute(candles);
        let mut out = vec![Direction::Flat; candles.len()];

        let mut state = Direction::Flat;
        for i in self.warmup_bars()..candles.len() {
            let close = candles[i].close;
            if close > upper[i] {
                state = Direction::Long;
            } else if close < lower[i] {
                state = Direction::Flat;
            }
            out[i] = state;
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(i: usize, close: f64, high: f64, low: f64) -> Candle {
        Candle {
            time: i as i64 * 60,
            open: close,
            high,
            low,
            close,
        }
    }

    /// Range-bound bars (high 102, low 98, close 100) with overrides.
    fn range_bars(n: usize) -> Vec<Candle> {
        (0..n).map(|i| candle(i, 100.0, 102.0, 98.0)).collect()
    }

    #[test]
    fn fires_on_new_high_close() {
        let mut candles = range_bars(10);
        candles[7] = candle(7, 103.0, 103.5, 99.0);
        let out = Breakout::new(5).directions(&candles);
        assert_eq!(out[6], Direction::Flat);
        assert_eq!(out[7], Direction::Long);
        // Holds while inside the channel
        assert_eq!(out[8], Direction::Long);
        assert_eq!(out[9], Direction::Long);
    }

    #[test]
    fn exits_on_new_low_close() {
        let mut candles = range_bars(12);
        candles[6] = candle(6, 103.0, 103.5, 99.0);
        candles[9] = candle(9, 97.0, 99.0, 96.5);
        let out = Breakout::new(5).directions(&candles);
        assert_eq!(out[6], Direction::Long);
        assert_eq!(out[8], Direction::Long);
        assert_eq!(out[9], Direction::Flat);
        assert_eq!(out[11], Direction::Flat);
    }

    #[test]
    fn close_equal_to_channel_high_is_not_a_breakout() {
        let mut candles = range_bars(8);
        candles[6] = candle(6, 102.0, 102.0, 99.0);
        let out = Breakout::new(5).directions(&candles);
        assert_eq!(out[6], Direction::Flat);
    }

    #[test]
    fn warmup_guard() {
        // A huge close at bar 3 is ignored: only 3 bars of history exist.
        let mut candles = range_bars(10);
        candles[3] = candle(3, 150.0, 150.0, 99.0);
        let out = Breakout::new(5).directions(&candles);
        assert!(out[..5].iter().all(|d| *d == Direction::Flat));
    }

    #[test]
    fn flat_market_never_trades() {
        let candles: Vec<Candle> = (0..60).map(|i| candle(i, 100.0, 100.0, 100.0)).collect();
        let out = Breakout::default_params().directions(&candles);
        assert!(out.iter().all(|d| *d == Direction::Flat));
    }

    #[test]
    fn default_params_uses_20() {
        let sig = Breakout::default_params();
        assert_eq!(sig.lookback, 20);
        assert_eq!(sig.warmup_bars(), 20);
        assert_eq!(sig.name(), "breakout");
    }

    #[test]
    #[should_panic(expected = "lookback must be >= 1")]
    fn rejects_zero_lookback() {
        Breakout::new(0);
    }
}
