//! Benchmark projector: comparison curves for a candle series.
//!
//! - Buy-and-hold of the traded instrument: exact, always available.
//! - Peer curves for named reference symbols: the traded instrument's own
//!   closes scaled by a seeded per-symbol factor. These are a visual
//!   approximation only and carry no information about the peer symbol.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::{CandleSeries, EquityPoint};
use crate::rng::SeedHierarchy;

/// Range of the per-symbol peer scale factor: `[LOW, LOW + SPAN)`.
pub const PEER_FACTOR_LOW: f64 = 0.8;
pub const PEER_FACTOR_SPAN: f64 = 0.4;

/// An illustrative, synthetic comparison line for a reference symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerCurve {
    pub symbol: String,
    pub factor: f64,
    /// `close[i] * factor` in price units.
    pub points: Vec<EquityPoint>,
    /// Always true: the curve is not sourced from the peer's own prices.
    pub illustrative: bool,
}

/// `equity[i] = close[i] / close[0]`.
pub fn buy_and_hold(series: &CandleSeries) -> Vec<EquityPoint> {
    let Some(first) = series.first() else {
        return Vec::new();
    };
    let base = first.close;
    series
        .iter()
        .map(|c| EquityPoint::new(c.time, c.close / base))
        .collect()
}

/// The scale factor for `symbol` under `seed`.
pub fn peer_factor(symbol: &str, seed: u64) -> f64 {
    let mut rng = SeedHierarchy::new(seed).rng_for("benchmark", symbol);
    PEER_FACTOR_LOW + rng.gen::<f64>() * PEER_FACTOR_SPAN
}

/// One illustrative curve per symbol, in iteration order of `symbols`.
pub fn peer_curves<'a, I>(series: &CandleSeries, symbols: I, seed: u64) -> Vec<PeerCurve>
where
    I: IntoIterator<Item = &'a String>,
{
    symbols
        .into_iter()
        .map(|symbol| {
            let factor = peer_factor(symbol, seed);
            PeerCurve {
                symbol: symbol.clone(),
                factor,
                points: series
                    .iter()
                    .map(|c| EquityPoint::new(c.time, c.close * factor))
                    .collect(),
                illustrative: true,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Candle;
    use std::collections::BTreeSet;

    fn series(closes: &[f64]) -> CandleSeries {
        let candles = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Candle::new(i as i64, c, c, c, c))
            .collect();
        CandleSeries::try_new(candles).unwrap()
    }

    #[test]
    fn buy_and_hold_is_close_ratio() {
        let s = series(&[50.0, 55.0, 45.0, 75.0]);
        let curve = buy_and_hold(&s);
        assert_eq!(curve.len(), 4);
        assert_eq!(curve[0].value, 1.0);
        assert_eq!(curve[3].value, 75.0 / 50.0);
        assert_eq!(curve[2].time, 2);
    }

    #[test]
    fn buy_and_hold_empty() {
        assert!(buy_and_hold(&CandleSeries::empty()).is_empty());
    }

    #[test]
    fn peer_factor_in_range_and_deterministic() {
        for sym in ["SPY", "QQQ", "IWM", "VIX", "BTC"] {
            let f = peer_factor(sym, 11);
            assert!((0.8..1.2).contains(&f), "{sym}: {f}");
            assert_eq!(f, peer_factor(sym, 11));
        }
    }

    #[test]
    fn peer_curves_scale_closes() {
        let s = series(&[100.0, 110.0]);
        let symbols: BTreeSet<String> = ["QQQ".to_string(), "SPY".to_string()].into();
        let curves = peer_curves(&s, &symbols, 3);
        assert_eq!(curves.len(), 2);
        assert_eq!(curves[0].symbol, "QQQ");
        for curve in &curves {
            assert!(curve.illustrative);
            assert_eq!(curve.points.len(), 2);
            assert_eq!(curve.points[1].value, 110.0 * curve.factor);
        }
    }

    #[test]
    fn peer_factor_independent_of_other_symbols() {
        let s = series(&[100.0]);
        let one: BTreeSet<String> = ["SPY".to_string()].into();
        let two: BTreeSet<String> = ["AAA".to_string(), "SPY".to_string()].into();
        let a = peer_curves(&s, &one, 5);
        let b = peer_curves(&s, &two, 5);
        assert_eq!(a[0].factor, b[1].factor);
    }
}
