//! Tabular candle import/export: `time,open,high,low,close`.
//!
//! Import is lenient per row and strict per candle: a row that cannot be
//! parsed is skipped and counted, never fatal; parsed candles then go through
//! [`CandleSeries::from_candles`] under the caller's policy.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use stratlab_core::domain::{
    Candle, CandleSeries, RejectedCandle, SeriesError, ValidationPolicy,
};
use thiserror::Error;
use tracing::{debug, warn};

pub const HEADER: [&str; 5] = ["time", "open", "high", "low", "close"];

/// Errors from candle import or export.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to open '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid candle series: {0}")]
    Series(#[from] SeriesError),
}

/// A row that could not be turned into a candle.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based line number in the source, header included.
    pub line: u64,
    pub reason: String,
}

/// Result of an import.
#[derive(Debug, Clone)]
pub struct ImportedCandles {
    pub series: CandleSeries,
    /// Rows that could not be parsed.
    pub skipped: Vec<SkippedRow>,
    /// Parsed candles dropped by validation (`DropInvalid` only).
    pub rejected: Vec<RejectedCandle>,
}

/// Import candles from a CSV file.
pub fn import_candles(path: &Path, policy: ValidationPolicy) -> Result<ImportedCandles, ImportError> {
    let file = std::fs::File::open(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let imported = read_candles(file, policy)?;
    debug!(
        path = %path.display(),
        candles = imported.series.len(),
        skipped = imported.skipped.len(),
        rejected = imported.rejected.len(),
        "imported candles"
    );
    Ok(imported)
}

/// Import candles from any reader. The first line is a header and is not interpreted.
pub fn read_candles<R: Read>(reader: R, policy: ValidationPolicy) -> Result<ImportedCandles, ImportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut raw = Vec::new();
    let mut skipped = Vec::new();

    for (i, record) in rdr.records().enumerate() {
        // Header is line 1.
        let fallback_line = i as u64 + 2;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map_or(fallback_line, |p| p.line());
                skipped.push(SkippedRow {
                    line,
                    reason: e.to_string(),
                });
                continue;
            }
        };
        let line = record.position().map_or(fallback_line, |p| p.line());
        if record.iter().all(str::is_empty) {
            skipped.push(SkippedRow {
                line,
                reason: "empty row".to_string(),
            });
            continue;
        }
        match parse_record(&record) {
            Ok(candle) => raw.push(candle),
            Err(reason) => skipped.push(SkippedRow { line, reason }),
        }
    }

    if !skipped.is_empty() {
        warn!(count = skipped.len(), "skipped malformed candle rows");
    }

    let validated = CandleSeries::from_candles(raw, policy)?;
    Ok(ImportedCandles {
        series: validated.series,
        skipped,
        rejected: validated.rejected,
    })
}

fn parse_record(record: &csv::StringRecord) -> Result<Candle, String> {
    if record.len() < HEADER.len() {
        return Err(format!(
            "expected {} fields, found {}",
            HEADER.len(),
            record.len()
        ));
    }
    let time = parse_time(&record[0])?;
    let mut prices = [0.0_f64; 4];
    for (slot, (name, text)) in prices
        .iter_mut()
        .zip(HEADER[1..].iter().zip(record.iter().skip(1)))
    {
        *slot = text
            .parse::<f64>()
            .map_err(|_| format!("{name} '{text}' is not a number"))?;
    }
    let [open, high, low, close] = prices;
    Ok(Candle::new(time, open, high, low, close))
}

/// Parse unix seconds or a date / date-time string. Naive values are UTC.
///
/// Accepted: integer seconds, RFC 3339, `YYYY-MM-DD HH:MM[:SS]`,
/// `YYYY-MM-DDTHH:MM[:SS]`, `YYYY-MM-DD`.
pub fn parse_time(text: &str) -> Result<i64, String> {
    if let Ok(secs) = text.parse::<i64>() {
        return Ok(secs);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc).timestamp());
    }
    for format in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(dt.and_utc().timestamp());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc().timestamp());
        }
    }
    Err(format!("time '{text}' is neither unix seconds nor a recognised date"))
}

/// Write candles as CSV with the import header.
///
/// Floats use Rust's shortest round-trip formatting, so re-import is exact.
pub fn write_candles<W: Write>(writer: W, candles: &[Candle]) -> Result<(), ImportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)?;
    for c in candles {
        wtr.write_record([
            c.time.to_string(),
            c.open.to_string(),
            c.high.to_string(),
            c.low.to_string(),
            c.close.to_string(),
        ])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Export candles to a CSV file.
pub fn export_candles(path: &Path, candles: &[Candle]) -> Result<(), ImportError> {
    let file = std::fs::File::create(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_candles(file, candles)
}
