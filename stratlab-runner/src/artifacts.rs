//! Artifact export: per-run directory with JSON and CSV files.
//!
//! Layout: `<dir>/<symbol>_<variant>_<config hash prefix>/`
//! - `result.json`: the full [`BacktestResult`], schema-versioned
//! - `equity.csv`: `time,strategy,benchmark`
//! - `trades.csv`: one row per closed trade
//!
//! Unknown schema versions are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use stratlab_core::domain::ClosedTrade;

use crate::runner::{BacktestResult, SCHEMA_VERSION};

// ─── JSON ───────────────────────────────────────────────────────────

/// Serialize a `BacktestResult` to pretty JSON.
pub fn export_json(result: &BacktestResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize BacktestResult to JSON")
}

/// Deserialize a `BacktestResult` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<BacktestResult> {
    let result: BacktestResult =
        serde_json::from_str(json).context("failed to deserialize BacktestResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

// ─── CSV ────────────────────────────────────────────────────────────

/// Strategy and buy-and-hold equity side by side.
pub fn export_equity_csv(result: &BacktestResult) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["time", "strategy", "benchmark"])?;

    let out = &result.output;
    for (s, b) in out.strategy_equity.iter().zip(&out.benchmark_equity) {
        wtr.write_record([s.time.to_string(), s.value.to_string(), b.value.to_string()])?;
    }
    into_string(wtr)
}

/// Columns: entry_index, entry_time, entry_price, exit_index, exit_time,
/// exit_price, exit_reason, return_pct, bars_held
pub fn export_trades_csv(trades: &[ClosedTrade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "entry_index",
        "entry_time",
        "entry_price",
        "exit_index",
        "exit_time",
        "exit_price",
        "exit_reason",
        "return_pct",
        "bars_held",
    ])?;

    for t in trades {
        let reason = serde_json::to_value(t.exit_reason)?;
        wtr.write_record([
            t.entry_index.to_string(),
            t.entry_time.to_string(),
            t.entry_price.to_string(),
            t.exit_index.to_string(),
            t.exit_time.to_string(),
            t.exit_price.to_string(),
            reason.as_str().unwrap_or_default().to_string(),
            format!("{:.6}", t.return_pct() * 100.0),
            t.bars_held().to_string(),
        ])?;
    }
    into_string(wtr)
}

fn into_string(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}

// ─── Directory ──────────────────────────────────────────────────────

/// Per-run directory name: symbol, variant and config hash prefix.
pub fn run_dir_name(result: &BacktestResult) -> String {
    let symbol: String = result
        .config
        .symbol
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    format!(
        "{}_{}_{}",
        symbol,
        result.config.variant,
        result.fingerprint.config_hash.short()
    )
}

/// Write all artifacts under `dir` and return the run directory.
pub fn save_artifacts(result: &BacktestResult, dir: &Path) -> Result<PathBuf> {
    let run_dir = dir.join(run_dir_name(result));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create {}", run_dir.display()))?;

    let files = [
        ("result.json", export_json(result)?),
        ("equity.csv", export_equity_csv(result)?),
        ("trades.csv", export_trades_csv(&result.output.trades)?),
    ];
    for (name, content) in files {
        let path = run_dir.join(name);
        std::fs::write(&path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    tracing::info!(path = %run_dir.display(), "saved run artifacts");
    Ok(run_dir)
}
