//! Prior-window price channel: highest high / lowest low of the bars *before* t.
//!
//! - Upper: max(high[t-period..t-1])
//! - Lower: min(low[t-period..t-1])
//!
//! The current bar is excluded so that a close can be compared against the
//! channel it breaks out of. Lookback: period.

use super::Indicator;
use crate::domain::Candle;

/// Which band of the channel to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelBand {
    Upper,
    Lower,
}

#[derive(Debug, Clone)]
pub struct Channel {
    period: usize,
    band: ChannelBand,
    name: String,
}

impl Channel {
    pub fn upper(period: usize) -> Self {
        assert!(period >= 1, "channel period must be >= 1");
        Self {
            period,
            band: ChannelBand::Upper,
            name: format!("channel_upper_{period}"),
        }
    }

    pub fn lower(period: usize) -> Self {
        assert!(period >= 1, "channel period must be >= 1");
        Self {
            period,
            band: ChannelBand::Lower,
            name: format!("channel_lower_{period}"),
        }
    }
}

impl Indicator for Channel {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        let n = candles.len();
        let mut result = vec![f64::NAN; n];

        for i in self.period..n {
            let window = &candles[(i - self.period)..i];
            result[i] = match self.band {
                ChannelBand::Upper => window.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max),
                ChannelBand::Lower => window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min),
            };
        }

        result
    }
}
