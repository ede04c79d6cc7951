//! Technical indicator implementations.
//!
//! Stateless transforms over an ordered numeric series: each function takes
//! a slice of length N and returns a series of the same length and
//! alignment. Dispatch from an [`IndicatorKind`] happens through
//! [`calculate`]; the mapping is fixed at compile time.

pub mod ema;
pub mod rsi;
pub mod sma;

pub use ema::ema;
pub use rsi::rsi;
pub use sma::sma;

use crate::domain::ast::IndicatorKind;

/// Compute the named indicator over `series` with the given period.
pub fn calculate(kind: IndicatorKind, series: &[f64], period: usize) -> Vec<f64> {
    match kind {
        IndicatorKind::Sma => sma(series, period),
        IndicatorKind::Ema => ema(series, period),
        IndicatorKind::Rsi => rsi(series, period),
    }
}
