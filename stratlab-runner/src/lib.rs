//! StratLab Runner: backtest orchestration on top of `stratlab-core`.
//!
//! This crate provides:
//! - TOML run configuration
//! - CSV candle import/export
//! - Seeded synthetic candle supplier
//! - Strategy templates and share tokens
//! - Single-run and parallel variant comparison
//! - JSON/CSV artifact export

pub mod artifacts;
pub mod config;
pub mod csv_io;
pub mod runner;
pub mod synthetic;
pub mod templates;

pub use artifacts::save_artifacts;
pub use config::{BenchmarkSettings, ConfigError, DataSource, RunConfig};
pub use csv_io::{export_candles, import_candles, ImportError, ImportedCandles};
pub use runner::{
    compare_variants, load_series, run_backtest, run_on_series, BacktestResult, LoadedSeries,
    RunError, VariantSummary,
};
pub use synthetic::SyntheticSpec;
pub use templates::{decode_share_token, encode_share_token, TemplateError, TemplateStore};
