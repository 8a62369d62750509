//! StratLab Core: deterministic single-instrument strategy backtesting.
//!
//! This crate is pure computation with no I/O:
//! - Domain types (candles, series, configuration, signals, trades, equity)
//! - Indicators (SMA, RSI, price channels) with NaN warm-up
//! - Signal generators for the fixed strategy variants
//! - Bar-by-bar long-only position simulator with stop-loss / take-profit
//! - Benchmark projector (buy-and-hold plus seeded illustrative peer curves)
//! - Performance statistics
//! - Seed hierarchy and run fingerprints for reproducibility

pub mod benchmark;
pub mod domain;
pub mod engine;
pub mod fingerprint;
pub mod indicators;
pub mod rng;
pub mod signals;
pub mod simulator;
pub mod stats;

pub use engine::{run, EngineOutput};
pub use stats::Stats;
