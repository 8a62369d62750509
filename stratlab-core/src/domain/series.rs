//! CandleSeries: validated, strictly time-ordered candles for one instrument.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::candle::{Candle, CandleError};

/// What to do with a candle that breaks an invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    /// Drop the offending candle and keep going.
    #[default]
    DropInvalid,
    /// Fail the whole series on the first offending candle.
    RejectSeries,
}

/// Series construction failed under [`ValidationPolicy::RejectSeries`].
#[derive(Debug, Clone, PartialEq, Error)]
#[error("candle at index {index} rejected: {reason}")]
pub struct SeriesError {
    pub index: usize,
    pub reason: CandleError,
}

/// A candle dropped under [`ValidationPolicy::DropInvalid`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedCandle {
    /// Index in the raw input.
    pub index: usize,
    pub candle: Candle,
    #[serde(serialize_with = "serialize_reason")]
    pub reason: CandleError,
}

fn serialize_reason<S: serde::Serializer>(reason: &CandleError, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&reason.to_string())
}

/// Outcome of validating a raw candle list.
#[derive(Debug, Clone)]
pub struct ValidatedSeries {
    pub series: CandleSeries,
    pub rejected: Vec<RejectedCandle>,
}

/// Immutable, validated candle sequence. Insertion order is chronological order.
///
/// Every candle satisfies [`Candle::validate`] and `time` is strictly increasing.
/// An empty series is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validate `raw` under `policy`.
    ///
    /// Monotonicity is checked against the last *kept* candle, so a dropped
    /// candle never poisons its successors.
    pub fn from_candles(
        raw: Vec<Candle>,
        policy: ValidationPolicy,
    ) -> Result<ValidatedSeries, SeriesError> {
        let mut candles: Vec<Candle> = Vec::with_capacity(raw.len());
        let mut rejected = Vec::new();

        for (index, candle) in raw.into_iter().enumerate() {
            let verdict = candle.validate().and_then(|()| match candles.last() {
                Some(prev) if candle.time <= prev.time => Err(CandleError::NonMonotonicTime {
                    time: candle.time,
                    previous: prev.time,
                }),
                _ => Ok(()),
            });

            match verdict {
                Ok(()) => candles.push(candle),
                Err(reason) => match policy {
                    ValidationPolicy::RejectSeries => return Err(SeriesError { index, reason }),
                    ValidationPolicy::DropInvalid => {
                        debug!(index, %reason, "dropping invalid candle");
                        rejected.push(RejectedCandle {
                            index,
                            candle,
                            reason,
                        });
                    }
                },
            }
        }

        Ok(ValidatedSeries {
            series: Self { candles },
            rejected,
        })
    }

    /// Strict construction: any invalid candle fails the series.
    pub fn try_new(raw: Vec<Candle>) -> Result<Self, SeriesError> {
        Self::from_candles(raw, ValidationPolicy::RejectSeries).map(|v| v.series)
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn first(&self) -> Option<&Candle> {
        self.candles.first()
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candle> {
        self.candles.iter()
    }
}

impl<'a> IntoIterator for &'a CandleSeries {
    type Item = &'a Candle;
    type IntoIter = std::slice::Iter<'a, Candle>;

    fn into_iter(self) -> Self::IntoIter {
        self.candles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(time: i64, close: f64) -> Candle {
        Candle::new(time, close, close + 1.0, close - 1.0, close)
    }

    #[test]
    fn empty_series_is_valid() {
        let series = CandleSeries::try_new(Vec::new()).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.len(), 0);
        assert!(series.first().is_none());
    }

    #[test]
    fn valid_series_keeps_everything() {
        let raw = vec![candle(1, 10.0), candle(2, 11.0), candle(3, 12.0)];
        let validated = CandleSeries::from_candles(raw, ValidationPolicy::DropInvalid).unwrap();
        assert_eq!(validated.series.len(), 3);
        assert!(validated.rejected.is_empty());
        assert_eq!(validated.series.closes(), vec![10.0, 11.0, 12.0]);
    }

    #[test]
    fn drop_policy_skips_bad_candle() {
        let mut bad = candle(2, 11.0);
        bad.high = 5.0;
        let raw = vec![candle(1, 10.0), bad, candle(3, 12.0)];
        let validated = CandleSeries::from_candles(raw, ValidationPolicy::DropInvalid).unwrap();
        assert_eq!(validated.series.len(), 2);
        assert_eq!(validated.rejected.len(), 1);
        assert_eq!(validated.rejected[0].index, 1);
        assert_eq!(validated.rejected[0].reason, CandleError::HighLowViolation);
    }

    #[test]
    fn reject_policy_fails_whole_series() {
        let mut bad = candle(2, 11.0);
        bad.close = f64::NAN;
        let raw = vec![candle(1, 10.0), bad, candle(3, 12.0)];
        let err = CandleSeries::from_candles(raw, ValidationPolicy::RejectSeries).unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.reason, CandleError::NonFinite { field: "close" });
    }

    #[test]
    fn duplicate_time_is_rejected() {
        let raw = vec![candle(1, 10.0), candle(1, 11.0)];
        let err = CandleSeries::try_new(raw).unwrap_err();
        assert_eq!(
            err.reason,
            CandleError::NonMonotonicTime {
                time: 1,
                previous: 1
            }
        );
    }

    #[test]
    fn monotonicity_checked_against_kept_candles() {
        // The out-of-order candle is dropped; the next one is compared with t=5.
        let raw = vec![candle(5, 10.0), candle(3, 11.0), candle(6, 12.0)];
        let validated = CandleSeries::from_candles(raw, ValidationPolicy::DropInvalid).unwrap();
        let times: Vec<i64> = validated.series.iter().map(|c| c.time).collect();
        assert_eq!(times, vec![5, 6]);
        assert_eq!(validated.rejected[0].index, 1);
    }
}
