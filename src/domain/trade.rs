//! Closed trade records.

use chrono::NaiveDate;
use serde::Serialize;

/// One round trip: entry and exit with derived profit figures. Immutable
/// once closed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_price: f64,
    pub exit_price: f64,
    pub pnl: f64,
    pub return_pct: f64,
}

impl Trade {
    /// Build a closed trade, deriving pnl and percentage return.
    pub fn close(
        entry_date: NaiveDate,
        entry_price: f64,
        exit_date: NaiveDate,
        exit_price: f64,
    ) -> Self {
        let pnl = exit_price - entry_price;
        Self {
            entry_date,
            exit_date,
            entry_price,
            exit_price,
            pnl,
            return_pct: pnl / entry_price * 100.0,
        }
    }

    pub fn is_win(&self) -> bool {
        self.pnl > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn close_derives_pnl_and_return() {
        let trade = Trade::close(date(1), 10.0, date(3), 9.0);
        assert_relative_eq!(trade.pnl, -1.0);
        assert_relative_eq!(trade.return_pct, -10.0);
        assert!(!trade.is_win());
    }

    #[test]
    fn winning_trade() {
        let trade = Trade::close(date(1), 100.0, date(5), 110.0);
        assert_relative_eq!(trade.pnl, 10.0);
        assert_relative_eq!(trade.return_pct, 10.0);
        assert!(trade.is_win());
    }

    #[test]
    fn breakeven_is_not_a_win() {
        let trade = Trade::close(date(1), 50.0, date(2), 50.0);
        assert!(!trade.is_win());
    }
}
