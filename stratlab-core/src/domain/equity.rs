//! Equity curve points.

use serde::{Deserialize, Serialize};

/// Account value at the close of a bar, normalized so the first point is 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub time: i64,
    pub value: f64,
}

impl EquityPoint {
    pub fn new(time: i64, value: f64) -> Self {
        Self { time, value }
    }
}

/// Last value of a curve, or 1.0 for an empty curve.
pub fn final_value(curve: &[EquityPoint]) -> f64 {
    curve.last().map_or(1.0, |p| p.value)
}

/// Extract the bare values of a curve.
pub fn values(curve: &[EquityPoint]) -> Vec<f64> {
    curve.iter().map(|p| p.value).collect()
}
