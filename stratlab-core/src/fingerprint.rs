//! Run fingerprinting: deterministic identification of configurations and datasets.
//!
//! - `ConfigHash`: exact identity of a [`StrategyConfig`].
//! - `DatasetHash`: content hash of a candle series.
//! - `RunFingerprint`: both hashes plus the benchmark seed, enough to reproduce a run.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{CandleSeries, StrategyConfig};

/// BLAKE3 hash of a strategy configuration's canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigHash(pub String);

impl ConfigHash {
    /// Canonical form: fields in declaration order, benchmark symbols sorted
    /// (the set is a `BTreeSet`), floats in shortest round-trip notation.
    pub fn of(config: &StrategyConfig) -> Self {
        let benchmarks: Vec<&str> = config.benchmark_symbols.iter().map(String::as_str).collect();
        let canonical = format!(
            "{}|{}|{}|{:?}|{:?}|{}",
            config.symbol,
            config.timeframe,
            config.variant,
            config.risk_pct,
            config.target_pct,
            benchmarks.join(","),
        );
        Self(blake3::hash(canonical.as_bytes()).to_hex().to_string())
    }

    /// First 12 hex characters, for directory names and log lines.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for ConfigHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// BLAKE3 content hash of a candle series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetHash(pub String);

impl DatasetHash {
    /// Hashes the little-endian bytes of every field, candle by candle.
    pub fn of(series: &CandleSeries) -> Self {
        let mut hasher = blake3::Hasher::new();
        for c in series {
            hasher.update(&c.time.to_le_bytes());
            for v in [c.open, c.high, c.low, c.close] {
                hasher.update(&v.to_bits().to_le_bytes());
            }
        }
        Self(hasher.finalize().to_hex().to_string())
    }
}

impl fmt::Display for DatasetHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Complete identity of one backtest run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunFingerprint {
    pub config_hash: ConfigHash,
    pub dataset_hash: DatasetHash,
    pub benchmark_seed: u64,
}

impl RunFingerprint {
    pub fn new(config: &StrategyConfig, series: &CandleSeries, benchmark_seed: u64) -> Self {
        Self {
            config_hash: ConfigHash::of(config),
            dataset_hash: DatasetHash::of(series),
            benchmark_seed,
        }
    }

    /// Single hash over all three parts.
    pub fn run_hash(&self) -> String {
        let canonical = format!(
            "{}:{}:{}",
            self.config_hash, self.dataset_hash, self.benchmark_seed
        );
        blake3::hash(canonical.as_bytes()).to_hex().to_string()
    }
}
