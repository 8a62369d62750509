//! Signal generation: turns candle history into per-bar position directives.
//!
//! Signals are portfolio-agnostic: a generator sees candles only, never the
//! simulated position. The directive at index `i` may depend on candles
//! `0..=i` only.

pub mod breakout;
pub mod rsi_reversion;
pub mod sma_cross;

pub use breakout::Breakout;
pub use rsi_reversion::RsiMeanReversion;
pub use sma_cross::SmaCross;

use crate::domain::{Candle, CandleSeries, Direction, Signal, StrategyVariant};

/// Trait for signal generators.
///
/// # Architecture invariant
/// `directions` receives only candle history. It must return exactly one
/// directive per candle and emit `Direction::Flat` during warm-up.
pub trait SignalGenerator: Send + Sync {
    /// Human-readable name (e.g., "sma_cross").
    fn name(&self) -> &str;

    /// Number of leading bars that are always Flat.
    fn warmup_bars(&self) -> usize;

    /// Compute one directive per candle.
    fn directions(&self, candles: &[Candle]) -> Vec<Direction>;
}

/// The generator for a variant, with that variant's fixed parameters.
pub fn for_variant(variant: StrategyVariant) -> Box<dyn SignalGenerator> {
    match variant {
        StrategyVariant::SmaCross => Box::new(SmaCross::default_params()),
        StrategyVariant::Breakout => Box::new(Breakout::default_params()),
        StrategyVariant::RsiMeanReversion => Box::new(RsiMeanReversion::default_params()),
    }
}

/// Generate the time-aligned signal stream for `series`.
pub fn generate_signals(series: &CandleSeries, variant: StrategyVariant) -> Vec<Signal> {
    let generator = for_variant(variant);
    let directions = generator.directions(series.candles());
    debug_assert_eq!(directions.len(), series.len());
    series
        .iter()
        .zip(directions)
        .map(|(candle, direction)| Signal {
            time: candle.time,
            direction,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_candles;

    #[test]
    fn for_variant_names() {
        assert_eq!(for_variant(StrategyVariant::SmaCross).name(), "sma_cross");
        assert_eq!(for_variant(StrategyVariant::Breakout).name(), "breakout");
        assert_eq!(
            for_variant(StrategyVariant::RsiMeanReversion).name(),
            "rsi_mean_reversion"
        );
    }

    #[test]
    fn signals_align_with_candles() {
        let closes: Vec<f64> = (0..80).map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0).collect();
        let series = CandleSeries::try_new(make_candles(&closes)).unwrap();
        for variant in StrategyVariant::ALL {
            let signals = generate_signals(&series, variant);
            assert_eq!(signals.len(), series.len());
            for (signal, candle) in signals.iter().zip(series.iter()) {
                assert_eq!(signal.time, candle.time);
            }
        }
    }

    #[test]
    fn empty_series_gives_no_signals() {
        for variant in StrategyVariant::ALL {
            assert!(generate_signals(&CandleSeries::empty(), variant).is_empty());
        }
    }
}
