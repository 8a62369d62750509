//! Position simulator: signals in, equity curve and closed trades out.
//!
//! Bar-by-bar, long-only, unit capital. Per bar while a position is open:
//! 1. stop-loss against the bar low (wins a tie with the target),
//! 2. take-profit against the bar high,
//! 3. otherwise the close-to-close return is compounded, and a signal that
//!    left Long closes the position at this bar's close.
//!
//! While flat, equity is carried forward. A position opens at the close of the
//! bar where the signal transitions into Long.

use serde::{Deserialize, Serialize};

use crate::domain::{CandleSeries, ClosedTrade, Direction, EquityPoint, ExitReason, Signal};

/// Price-based exits, as fractions of the entry price.
///
/// `None` disables the exit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ExitRules {
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
}

impl ExitRules {
    /// Build from percentages (2.0 = 2%). Zero, negative or non-finite
    /// percentages disable the exit rather than firing immediately.
    pub fn from_pcts(risk_pct: f64, target_pct: f64) -> Self {
        let enabled = |pct: f64| (pct.is_finite() && pct > 0.0).then_some(pct / 100.0);
        Self {
            stop_loss: enabled(risk_pct),
            take_profit: enabled(target_pct),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn stop_price(&self, entry_price: f64) -> Option<f64> {
        self.stop_loss.map(|f| entry_price * (1.0 - f))
    }

    pub fn target_price(&self, entry_price: f64) -> Option<f64> {
        self.take_profit.map(|f| entry_price * (1.0 + f))
    }
}

/// Output of a simulation run. All vectors except `trades` have one entry per candle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Simulation {
    pub equity: Vec<EquityPoint>,
    /// Exposure held at the close of each bar.
    pub positions: Vec<Direction>,
    pub trades: Vec<ClosedTrade>,
}

impl Simulation {
    pub fn final_equity(&self) -> f64 {
        crate::domain::equity::final_value(&self.equity)
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenPosition {
    entry_index: usize,
    entry_price: f64,
}

/// Run the position simulator.
///
/// `signals` must be aligned with `series` by index; missing trailing signals
/// read as Flat. `Direction::Short` is treated as Flat.
pub fn simulate(series: &CandleSeries, signals: &[Signal], rules: ExitRules) -> Simulation {
    let candles = series.candles();
    let n = candles.len();
    let mut equity_curve = Vec::with_capacity(n);
    let mut positions = Vec::with_capacity(n);
    let mut trades = Vec::new();

    let wants_long = |i: usize| signals.get(i).is_some_and(|s| s.direction.is_long());

    let mut equity = 1.0_f64;
    let mut open: Option<OpenPosition> = None;

    for (i, bar) in candles.iter().enumerate() {
        if let Some(pos) = open {
            let prev_close = candles[i - 1].close;
            let stop = rules.stop_price(pos.entry_price);
            let target = rules.target_price(pos.entry_price);

            let exit = match (stop, target) {
                (Some(stop), _) if bar.low <= stop => Some((stop, ExitReason::StopLoss)),
                (_, Some(target)) if bar.high >= target => Some((target, ExitReason::TakeProfit)),
                _ => None,
            };

            let exit = match exit {
                Some((price, reason)) => {
                    equity *= price / prev_close;
                    Some((price, reason))
                }
                None => {
                    equity *= bar.close / prev_close;
                    (!wants_long(i)).then_some((bar.close, ExitReason::Signal))
                }
            };

            if let Some((exit_price, exit_reason)) = exit {
                trades.push(ClosedTrade {
                    entry_index: pos.entry_index,
                    entry_time: candles[pos.entry_index].time,
                    entry_price: pos.entry_price,
                    exit_index: i,
                    exit_time: bar.time,
                    exit_price,
                    exit_reason,
                });
                open = None;
            }
        } else if wants_long(i) && (i == 0 || !wants_long(i - 1)) {
            open = Some(OpenPosition {
                entry_index: i,
                entry_price: bar.close,
            });
        }

        positions.push(if open.is_some() {
            Direction::Long
        } else {
            Direction::Flat
        });
        equity_curve.push(EquityPoint::new(bar.time, equity));
    }

    Simulation {
        equity: equity_curve,
        positions,
        trades,
    }
}
