//! Backtest runner: loads candles, runs the engine, packages the result.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use stratlab_core::benchmark::{peer_curves, PeerCurve};
use stratlab_core::domain::{CandleSeries, StrategyConfig, StrategyVariant};
use stratlab_core::engine::{self, EngineOutput};
use stratlab_core::fingerprint::RunFingerprint;
use stratlab_core::Stats;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{ConfigError, DataSource, RunConfig};
use crate::csv_io::{import_candles, ImportError};
use crate::synthetic;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] ImportError),
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result of a single backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub config: StrategyConfig,
    pub fingerprint: RunFingerprint,
    pub bar_count: usize,
    /// True when the candles came from the synthetic supplier.
    pub has_synthetic: bool,
    /// Source rows that could not be parsed.
    pub skipped_rows: usize,
    /// Parsed candles dropped by validation.
    pub rejected_candles: usize,
    #[serde(flatten)]
    pub output: EngineOutput,
    /// Illustrative peer curves, one per benchmark symbol.
    pub peers: Vec<PeerCurve>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl BacktestResult {
    pub fn strategy_stats(&self) -> &Stats {
        &self.output.strategy_stats
    }

    pub fn benchmark_stats(&self) -> &Stats {
        &self.output.benchmark_stats
    }
}

/// Candles ready for the engine, with import diagnostics.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub series: CandleSeries,
    pub has_synthetic: bool,
    pub skipped_rows: usize,
    pub rejected_candles: usize,
}

/// Load the candles a run configuration points at.
pub fn load_series(config: &RunConfig) -> Result<LoadedSeries, RunError> {
    match &config.data {
        DataSource::Csv { path, policy } => {
            let imported = import_candles(path, *policy)?;
            Ok(LoadedSeries {
                series: imported.series,
                has_synthetic: false,
                skipped_rows: imported.skipped.len(),
                rejected_candles: imported.rejected.len(),
            })
        }
        DataSource::Synthetic(spec) => {
            warn!(
                symbol = %config.strategy.symbol,
                seed = spec.seed,
                "using synthetic candles; results are tagged as synthetic"
            );
            let candles =
                synthetic::generate(&config.strategy.symbol, config.strategy.timeframe, spec);
            // The generator only emits valid candles; the drop policy keeps this total.
            let validated = CandleSeries::from_candles(candles, Default::default())
                .map_err(ImportError::from)?;
            Ok(LoadedSeries {
                series: validated.series,
                has_synthetic: true,
                skipped_rows: 0,
                rejected_candles: validated.rejected.len(),
            })
        }
    }
}

/// Run a backtest from a run configuration (loads data first).
///
/// This is the high-level entry point used by the CLI. For pre-loaded data,
/// use [`run_on_series`] instead.
pub fn run_backtest(config: &RunConfig) -> Result<BacktestResult, RunError> {
    config.validate()?;
    let loaded = load_series(config)?;
    let mut result = run_on_series(&loaded.series, &config.strategy, config.benchmark.seed);
    result.has_synthetic = loaded.has_synthetic;
    result.skipped_rows = loaded.skipped_rows;
    result.rejected_candles = loaded.rejected_candles;
    Ok(result)
}

/// Run a backtest on pre-loaded candles without any I/O.
pub fn run_on_series(
    series: &CandleSeries,
    config: &StrategyConfig,
    benchmark_seed: u64,
) -> BacktestResult {
    let output = engine::run(series, config);
    let peers = peer_curves(series, &config.benchmark_symbols, benchmark_seed);
    let fingerprint = RunFingerprint::new(config, series, benchmark_seed);

    debug!(
        symbol = %config.symbol,
        variant = %config.variant,
        config_hash = fingerprint.config_hash.short(),
        bars = series.len(),
        "backtest complete"
    );

    BacktestResult {
        schema_version: SCHEMA_VERSION,
        config: config.clone(),
        fingerprint,
        bar_count: series.len(),
        has_synthetic: false,
        skipped_rows: 0,
        rejected_candles: 0,
        output,
        peers,
    }
}

/// One row of a variant comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantSummary {
    pub variant: StrategyVariant,
    pub strategy_stats: Stats,
    pub benchmark_stats: Stats,
    pub trade_count: usize,
    pub final_equity: f64,
}

/// Run every strategy variant over the same series in parallel.
///
/// Rows come back in [`StrategyVariant::ALL`] order regardless of scheduling.
pub fn compare_variants(series: &CandleSeries, config: &StrategyConfig) -> Vec<VariantSummary> {
    StrategyVariant::ALL
        .par_iter()
        .map(|&variant| {
            let output = engine::run(series, &config.with_variant(variant));
            VariantSummary {
                variant,
                strategy_stats: output.strategy_stats,
                benchmark_stats: output.benchmark_stats,
                trade_count: output.trades.len(),
                final_equity: output.final_equity(),
            }
        })
        .collect()
}
