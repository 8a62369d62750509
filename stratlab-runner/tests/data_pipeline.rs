//! CSV import/export through real files.

use proptest::prelude::*;
use std::io::Write;
use stratlab_core::domain::{Candle, Timeframe, ValidationPolicy};
use stratlab_runner::csv_io::{export_candles, import_candles, read_candles};
use stratlab_runner::synthetic::{generate, SyntheticSpec};

fn valid_rows(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            let c = 100.0 + i as f64 * 0.25;
            format!("{},{},{},{},{}", 1_700_000_000 + i * 60, c, c + 1.0, c - 1.0, c)
        })
        .collect()
}

#[test]
fn export_then_import_reproduces_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("btc.csv");
    let spec = SyntheticSpec::new(11).with_bars(500).ending_at(1_726_000_000);
    let candles = generate("BTC", Timeframe::FiveMinutes, &spec);

    export_candles(&path, &candles).unwrap();
    let imported = import_candles(&path, ValidationPolicy::RejectSeries).unwrap();

    assert_eq!(imported.series.candles(), &candles[..]);
    assert!(imported.skipped.is_empty());
    assert!(imported.rejected.is_empty());
}

#[test]
fn three_field_row_among_fifty_rows_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gappy.csv");
    let mut rows = valid_rows(49);
    rows.insert(25, "1700001490,100,101".to_string());

    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "time,open,high,low,close").unwrap();
    for row in &rows {
        writeln!(file, "{row}").unwrap();
    }
    drop(file);

    let imported = import_candles(&path, ValidationPolicy::DropInvalid).unwrap();
    assert_eq!(imported.series.len(), 49);
    assert_eq!(imported.skipped.len(), 1);
    assert_eq!(imported.skipped[0].line, 27);
}

#[test]
fn out_of_order_rows_are_dropped_not_fatal() {
    let text = "time,open,high,low,close\n\
                10,5,6,4,5\n\
                30,5,6,4,5\n\
                20,5,6,4,5\n\
                40,5,6,4,5\n";
    let imported = read_candles(text.as_bytes(), ValidationPolicy::DropInvalid).unwrap();
    let times: Vec<i64> = imported.series.iter().map(|c| c.time).collect();
    assert_eq!(times, vec![10, 30, 40]);
    assert_eq!(imported.rejected.len(), 1);
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = import_candles(&dir.path().join("nope.csv"), ValidationPolicy::DropInvalid);
    assert!(result.is_err());
}

proptest! {
    /// Any finite positive prices survive the text round trip bit for bit.
    #[test]
    fn float_formatting_round_trips(
        base in 1e-6..1e9_f64,
        spread in 0.0..0.5_f64,
    ) {
        let candle = Candle::new(42, base, base * (1.0 + spread), base * (1.0 - spread / 2.0), base);
        let mut buf = Vec::new();
        stratlab_runner::csv_io::write_candles(&mut buf, &[candle]).unwrap();
        let imported = read_candles(&buf[..], ValidationPolicy::RejectSeries).unwrap();
        prop_assert_eq!(imported.series.candles(), &[candle][..]);
    }
}
