//! OHLCV bar representation.

use chrono::NaiveDate;
use serde::Serialize;

/// One open/high/low/close/volume observation for a single trading date.
///
/// Bar tables are finite, date-ordered sequences with unique dates. Gaps
/// (weekends, holidays) are simply absent rows; nothing enforces continuity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}
