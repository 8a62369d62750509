//! ClosedTrade: a completed long round trip.

use serde::{Deserialize, Serialize};

/// What closed a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    /// The signal left Long; filled at the bar close.
    Signal,
    /// Intrabar low reached the stop; filled at the stop price.
    StopLoss,
    /// Intrabar high reached the target; filled at the target price.
    TakeProfit,
}

/// A realized long trade: entry at a close, exit at a close or a price level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedTrade {
    pub entry_index: usize,
    pub entry_time: i64,
    pub entry_price: f64,
    pub exit_index: usize,
    pub exit_time: i64,
    pub exit_price: f64,
    pub exit_reason: ExitReason,
}

impl ClosedTrade {
    /// Realized return as a fraction of the entry price.
    pub fn return_pct(&self) -> f64 {
        if self.entry_price <= 0.0 {
            return 0.0;
        }
        self.exit_price / self.entry_price - 1.0
    }

    pub fn is_winner(&self) -> bool {
        self.return_pct() > 0.0
    }

    pub fn bars_held(&self) -> usize {
        self.exit_index.saturating_sub(self.entry_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade(entry: f64, exit: f64) -> ClosedTrade {
        ClosedTrade {
            entry_index: 3,
            entry_time: 300,
            entry_price: entry,
            exit_index: 8,
            exit_time: 800,
            exit_price: exit,
            exit_reason: ExitReason::Signal,
        }
    }

    #[test]
    fn winner_and_loser() {
        assert!(trade(100.0, 105.0).is_winner());
        assert!(!trade(100.0, 95.0).is_winner());
        assert!(!trade(100.0, 100.0).is_winner());
    }

    #[test]
    fn return_and_duration() {
        let t = trade(100.0, 110.0);
        assert!((t.return_pct() - 0.1).abs() < 1e-12);
        assert_eq!(t.bars_held(), 5);
    }

    #[test]
    fn exit_reason_serializes_snake_case() {
        let json = serde_json::to_string(&ExitReason::TakeProfit).unwrap();
        assert_eq!(json, "\"take_profit\"");
    }
}
