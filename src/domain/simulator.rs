//! Trade simulation state machine.
//!
//! Consumes a bar table and its aligned signal columns in time order and
//! emits closed trades. The position is a two-state machine:
//!
//! - `Flat` --entry signal--> `Long` (open at the configured entry column)
//! - `Long` --exit signal--> `Flat` (close at the configured exit column)
//!
//! Within a row, exit runs before entry, and an entry signal on the row
//! that just closed a position is not reused: only rows after the close are
//! eligible for a fresh entry. A position still open after the last row is
//! force-closed at that row's exit price, so every run ends flat.

use crate::domain::backtest::BacktestConfig;
use crate::domain::error::StratlangError;
use crate::domain::metrics::BacktestResult;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::signal::SignalTable;
use crate::domain::trade::Trade;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Position {
    Flat,
    Long {
        entry_date: NaiveDate,
        entry_price: f64,
    },
}

/// Run the simulation and compute aggregate metrics.
///
/// `bars` and `signals` must be index-aligned; a length mismatch is a
/// precondition violation reported as a config error.
pub fn run(
    bars: &[OhlcvBar],
    signals: &SignalTable,
    config: &BacktestConfig,
) -> Result<BacktestResult, StratlangError> {
    if bars.len() != signals.len() {
        return Err(StratlangError::Config {
            reason: format!(
                "signal table length {} does not match bar table length {}",
                signals.len(),
                bars.len()
            ),
        });
    }

    let entry_prices = config.entry_price_field.column(bars);
    let exit_prices = config.exit_price_field.column(bars);

    let mut trades = Vec::new();
    let mut position = Position::Flat;

    for (i, bar) in bars.iter().enumerate() {
        let flat_at_row_start = position == Position::Flat;

        if let Position::Long {
            entry_date,
            entry_price,
        } = position
        {
            if signals.exit[i] {
                trades.push(Trade::close(entry_date, entry_price, bar.date, exit_prices[i]));
                position = Position::Flat;
            }
        }

        if flat_at_row_start && signals.entry[i] {
            position = Position::Long {
                entry_date: bar.date,
                entry_price: entry_prices[i],
            };
        }
    }

    // Forced liquidation at the final bar.
    if let Position::Long {
        entry_date,
        entry_price,
    } = position
    {
        let last = bars.len() - 1;
        trades.push(Trade::close(
            entry_date,
            entry_price,
            bars[last].date,
            exit_prices[last],
        ));
    }

    Ok(BacktestResult::compute(trades, config.initial_capital))
}
