//! Performance statistics: pure functions that reduce an equity curve.
//!
//! Every degenerate case (empty curve, single point, zero variance, zero
//! trades) yields 0.0 rather than NaN or infinity.

use serde::{Deserialize, Serialize};

use crate::domain::equity::values;
use crate::domain::{ClosedTrade, EquityPoint, Timeframe};

/// Summary statistics of one equity curve.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Stats {
    /// Total return in percent.
    pub pnl_pct: f64,
    /// Annualized Sharpe ratio (zero risk-free rate).
    pub sharpe: f64,
    /// Fraction of closed trades with a positive return, in [0, 1].
    pub win_rate: f64,
    /// Largest peak-to-trough decline in percent, in [-100, 0].
    pub max_drawdown_pct: f64,
}

impl Stats {
    /// Compute all statistics from an equity curve and its closed trades.
    pub fn compute(equity: &[EquityPoint], trades: &[ClosedTrade], timeframe: Timeframe) -> Self {
        let curve = values(equity);
        Self {
            pnl_pct: pnl_pct(&curve),
            sharpe: sharpe_ratio(&curve, timeframe.bars_per_year()),
            win_rate: win_rate(trades),
            max_drawdown_pct: max_drawdown_pct(&curve),
        }
    }
}

// ─── Individual statistics ──────────────────────────────────────────

/// Total return in percent: (last / first - 1) * 100.
pub fn pnl_pct(equity: &[f64]) -> f64 {
    let (Some(&first), Some(&last)) = (equity.first(), equity.last()) else {
        return 0.0;
    };
    if equity.len() < 2 || first <= 0.0 {
        return 0.0;
    }
    (last / first - 1.0) * 100.0
}

/// Annualized Sharpe ratio from per-bar returns.
///
/// Sharpe = mean(r) / std(r) * sqrt(bars_per_year), sample standard deviation.
/// Returns 0.0 with fewer than two returns or (numerically) zero variance.
pub fn sharpe_ratio(equity: &[f64], bars_per_year: f64) -> f64 {
    let returns = bar_returns(equity);
    if returns.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(&returns);
    let std = std_dev(&returns);
    if std < 1e-15 {
        return 0.0;
    }
    (mean / std) * bars_per_year.sqrt()
}

/// Win rate: fraction of closed trades that were winners.
pub fn win_rate(trades: &[ClosedTrade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let winners = trades.iter().filter(|t| t.is_winner()).count();
    winners as f64 / trades.len() as f64
}

/// Maximum drawdown as a non-positive percentage (e.g., -15.0 = 15% drawdown).
///
/// Returns 0.0 if the curve never falls below a running peak.
pub fn max_drawdown_pct(equity: &[f64]) -> f64 {
    let Some(&first) = equity.first() else {
        return 0.0;
    };
    let mut peak = first;
    let mut max_dd = 0.0_f64;

    for &eq in equity {
        if eq > peak {
            peak = eq;
        }
        if peak > 0.0 {
            let dd = (eq - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    (max_dd * 100.0).max(-100.0)
}

// ─── Helpers ────────────────────────────────────────────────────────

/// Per-bar returns: r[i] = equity[i] / equity[i-1] - 1.
pub fn bar_returns(equity: &[f64]) -> Vec<f64> {
    equity
        .windows(2)
        .map(|w| if w[0] > 0.0 { w[1] / w[0] - 1.0 } else { 0.0 })
        .collect()
}

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
