#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
pub use stratlang::domain::ohlcv::OhlcvBar;
use stratlang::domain::signal::SignalTable;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Bars on consecutive calendar days starting 2024-01-01, with open/high/low
/// derived from the close.
pub fn make_bars(closes: &[f64]) -> Vec<OhlcvBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            date: date(2024, 1, 1) + Duration::days(i as i64),
            open: close,
            high: close * 1.01,
            low: close * 0.99,
            close,
            volume: 10_000 + i as i64,
        })
        .collect()
}

pub fn make_signals(entry: &[bool], exit: &[bool]) -> SignalTable {
    SignalTable {
        entry: entry.to_vec(),
        exit: exit.to_vec(),
    }
}

/// Render a bar table as CSV text with the standard header.
pub fn bars_to_csv(bars: &[OhlcvBar]) -> String {
    let mut out = String::from("date,open,high,low,close,volume\n");
    for bar in bars {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
        ));
    }
    out
}
