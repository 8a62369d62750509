//! Position directives emitted by signal generators.

use serde::{Deserialize, Serialize};

/// Desired exposure at the close of a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Long,
    #[default]
    Flat,
    Short,
}

impl Direction {
    pub fn is_long(&self) -> bool {
        matches!(self, Direction::Long)
    }
}

/// One directive per candle, aligned with the series by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub time: i64,
    pub direction: Direction,
}
