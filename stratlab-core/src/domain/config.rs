//! Strategy configuration: the declarative trading-rule value object.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Failed to parse a [`Timeframe`] or [`StrategyVariant`] from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

/// Bar duration of a candle series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "1d")]
    OneDay,
}

impl Timeframe {
    pub const ALL: [Timeframe; 4] = [
        Timeframe::OneMinute,
        Timeframe::FiveMinutes,
        Timeframe::OneHour,
        Timeframe::OneDay,
    ];

    pub fn step_seconds(&self) -> i64 {
        match self {
            Timeframe::OneMinute => 60,
            Timeframe::FiveMinutes => 300,
            Timeframe::OneHour => 3_600,
            Timeframe::OneDay => 86_400,
        }
    }

    /// Bars per year used to annualize the Sharpe ratio.
    ///
    /// Exchange-session convention: 252 trading days of 6.5 hours.
    pub fn bars_per_year(&self) -> f64 {
        match self {
            Timeframe::OneMinute => 252.0 * 390.0,
            Timeframe::FiveMinutes => 252.0 * 78.0,
            Timeframe::OneHour => 252.0 * 6.5,
            Timeframe::OneDay => 252.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::OneMinute => "1m",
            Timeframe::FiveMinutes => "5m",
            Timeframe::OneHour => "1h",
            Timeframe::OneDay => "1d",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timeframe::ALL
            .into_iter()
            .find(|tf| tf.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError {
                kind: "timeframe",
                value: s.to_string(),
                expected: "1m, 5m, 1h, 1d",
            })
    }
}

/// The closed set of trading rules the engine knows.
///
/// Parameters are fixed per variant; see the generators in [`crate::signals`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyVariant {
    SmaCross,
    Breakout,
    RsiMeanReversion,
}

impl StrategyVariant {
    pub const ALL: [StrategyVariant; 3] = [
        StrategyVariant::SmaCross,
        StrategyVariant::Breakout,
        StrategyVariant::RsiMeanReversion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyVariant::SmaCross => "sma_cross",
            StrategyVariant::Breakout => "breakout",
            StrategyVariant::RsiMeanReversion => "rsi_mean_reversion",
        }
    }
}

impl fmt::Display for StrategyVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyVariant {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        StrategyVariant::ALL
            .into_iter()
            .find(|v| v.as_str() == normalized)
            .ok_or_else(|| ParseError {
                kind: "strategy variant",
                value: s.to_string(),
                expected: "sma_cross, breakout, rsi_mean_reversion",
            })
    }
}

/// Declarative strategy settings, owned by the caller. The engine never mutates it.
///
/// `risk_pct` and `target_pct` are percentages (2.0 = 2%); zero disables the
/// corresponding exit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub variant: StrategyVariant,
    pub risk_pct: f64,
    pub target_pct: f64,
    #[serde(default)]
    pub benchmark_symbols: BTreeSet<String>,
}

impl StrategyConfig {
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe, variant: StrategyVariant) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            variant,
            risk_pct: 0.0,
            target_pct: 0.0,
            benchmark_symbols: BTreeSet::new(),
        }
    }

    pub fn with_exits(mut self, risk_pct: f64, target_pct: f64) -> Self {
        self.risk_pct = risk_pct;
        self.target_pct = target_pct;
        self
    }

    pub fn with_benchmarks<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.benchmark_symbols = symbols.into_iter().map(Into::into).collect();
        self
    }

    /// Same settings with a different variant.
    pub fn with_variant(&self, variant: StrategyVariant) -> Self {
        Self {
            variant,
            ..self.clone()
        }
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self::new("BTC", Timeframe::OneHour, StrategyVariant::SmaCross)
            .with_exits(2.0, 5.0)
            .with_benchmarks(["SPY"])
    }
}
