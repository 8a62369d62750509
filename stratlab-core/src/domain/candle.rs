//! Candle: the fundamental market data unit.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OHLC bar for one fixed-duration interval.
///
/// `time` is the bar's open time in unix seconds. Candles carry no symbol:
/// a [`CandleSeries`](super::CandleSeries) is always a single instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Why a candle failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CandleError {
    #[error("{field} is not a finite number")]
    NonFinite { field: &'static str },

    #[error("{field} must be strictly positive")]
    NonPositive { field: &'static str },

    #[error("high/low do not contain open and close")]
    HighLowViolation,

    #[error("time {time} does not follow previous time {previous}")]
    NonMonotonicTime { time: i64, previous: i64 },
}

impl Candle {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
        }
    }

    fn fields(&self) -> [(&'static str, f64); 4] {
        [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ]
    }

    /// Check the per-candle invariant: finite, positive prices with
    /// `low <= min(open, close) <= max(open, close) <= high`.
    ///
    /// Time ordering is a property of the series, not of a single candle.
    pub fn validate(&self) -> Result<(), CandleError> {
        for (field, value) in self.fields() {
            if !value.is_finite() {
                return Err(CandleError::NonFinite { field });
            }
        }
        for (field, value) in self.fields() {
            if value <= 0.0 {
                return Err(CandleError::NonPositive { field });
            }
        }
        let body_low = self.open.min(self.close);
        let body_high = self.open.max(self.close);
        if self.low > body_low || body_high > self.high {
            return Err(CandleError::HighLowViolation);
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}
