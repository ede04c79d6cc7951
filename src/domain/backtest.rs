//! Backtest parameters.

use crate::domain::ast::SeriesName;

pub const DEFAULT_INITIAL_CAPITAL: f64 = 100_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    /// Bar column used for entry fills.
    pub entry_price_field: SeriesName,
    /// Bar column used for exit fills.
    pub exit_price_field: SeriesName,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            entry_price_field: SeriesName::Close,
            exit_price_field: SeriesName::Close,
        }
    }
}
