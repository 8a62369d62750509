//! Serializable run configuration, loaded from TOML.
//!
//! ```toml
//! [strategy]
//! symbol = "BTC"
//! timeframe = "1h"
//! variant = "sma_cross"
//! risk_pct = 2.0
//! target_pct = 5.0
//! benchmark_symbols = ["SPY"]
//!
//! [data]
//! source = "synthetic"
//! seed = 42
//!
//! [benchmark]
//! seed = 7
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stratlab_core::domain::{StrategyConfig, ValidationPolicy};
use thiserror::Error;

use crate::synthetic::SyntheticSpec;

/// Errors from loading or validating a run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Where the candles come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum DataSource {
    /// A `time,open,high,low,close` file.
    Csv {
        path: PathBuf,
        #[serde(default)]
        policy: ValidationPolicy,
    },
    /// Seeded synthetic candles. Results are tagged as synthetic.
    Synthetic(SyntheticSpec),
}

/// Seed for the illustrative peer curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BenchmarkSettings {
    #[serde(default)]
    pub seed: u64,
}

/// Everything needed to reproduce a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub strategy: StrategyConfig,
    pub data: DataSource,
    #[serde(default)]
    pub benchmark: BenchmarkSettings,
}

impl RunConfig {
    pub fn new(strategy: StrategyConfig, data: DataSource) -> Self {
        Self {
            strategy,
            data,
            benchmark: BenchmarkSettings::default(),
        }
    }

    /// Parse and validate a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&content)?;
        // Relative CSV paths are resolved against the config file's directory.
        if let DataSource::Csv { path: csv_path, .. } = &mut config.data {
            if csv_path.is_relative() {
                if let Some(dir) = path.parent() {
                    *csv_path = dir.join(&*csv_path);
                }
            }
        }
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.strategy;
        if s.symbol.trim().is_empty() {
            return Err(ConfigError::Invalid("strategy.symbol must not be empty".into()));
        }
        for (name, value) in [("risk_pct", s.risk_pct), ("target_pct", s.target_pct)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "strategy.{name} must be a finite, non-negative percentage (got {value})"
                )));
            }
        }
        if s.benchmark_symbols.iter().any(|b| b.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "strategy.benchmark_symbols must not contain empty names".into(),
            ));
        }
        if let DataSource::Synthetic(spec) = &self.data {
            if spec.bars == 0 {
                return Err(ConfigError::Invalid("data.bars must be at least 1".into()));
            }
            if !spec.start_price.is_finite() || spec.start_price <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "data.start_price must be positive (got {})",
                    spec.start_price
                )));
            }
        }
        Ok(())
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self.data, DataSource::Synthetic(_))
    }
}
