//! Domain types for StratLab

pub mod candle;
pub mod config;
pub mod equity;
pub mod series;
pub mod signal;
pub mod trade;

pub use candle::{Candle, CandleError};
pub use config::{ParseError, StrategyConfig, StrategyVariant, Timeframe};
pub use equity::EquityPoint;
pub use series::{CandleSeries, RejectedCandle, SeriesError, ValidatedSeries, ValidationPolicy};
pub use signal::{Direction, Signal};
pub use trade::{ClosedTrade, ExitReason};
