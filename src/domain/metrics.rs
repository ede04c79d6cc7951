//! Performance metrics over a closed trade list.

use crate::domain::trade::Trade;
use serde::Serialize;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Aggregate results of one simulation run. Constructed once per run and
/// never mutated afterward.
///
/// Total return is the plain sum of per-trade percentage returns, while the
/// drawdown equity curve compounds trade by trade. The asymmetry is
/// deliberate and matches the simulator's documented behavior.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestResult {
    pub trades: Vec<Trade>,
    pub total_return: f64,
    pub total_return_pct: f64,
    pub max_drawdown: f64,
    pub max_drawdown_pct: f64,
    pub num_trades: usize,
    pub win_rate: f64,
    pub avg_return: f64,
    pub sharpe_ratio: Option<f64>,
}

impl BacktestResult {
    pub fn compute(trades: Vec<Trade>, initial_capital: f64) -> Self {
        if trades.is_empty() {
            return Self {
                trades,
                total_return: 0.0,
                total_return_pct: 0.0,
                max_drawdown: 0.0,
                max_drawdown_pct: 0.0,
                num_trades: 0,
                win_rate: 0.0,
                avg_return: 0.0,
                sharpe_ratio: None,
            };
        }

        let returns: Vec<f64> = trades.iter().map(|t| t.return_pct).collect();
        let total_return_pct: f64 = returns.iter().sum();
        let total_return = initial_capital * total_return_pct / 100.0;

        let (max_drawdown, max_drawdown_pct) = compute_drawdown(&returns, initial_capital);

        let num_trades = trades.len();
        let wins = trades.iter().filter(|t| t.is_win()).count();
        let win_rate = wins as f64 / num_trades as f64;

        let avg_return = total_return_pct / num_trades as f64;
        let sharpe_ratio = compute_sharpe(&returns);

        Self {
            trades,
            total_return,
            total_return_pct,
            max_drawdown,
            max_drawdown_pct,
            num_trades,
            win_rate,
            avg_return,
            sharpe_ratio,
        }
    }
}

/// Compounding equity curve: each trade multiplies equity by
/// `1 + return_pct/100`. Tracks the running peak and returns the largest
/// absolute and percentage decline from it.
fn compute_drawdown(returns: &[f64], initial_capital: f64) -> (f64, f64) {
    let mut equity = initial_capital;
    let mut peak = f64::MIN;
    let mut max_dd = 0.0_f64;
    let mut max_dd_pct = 0.0_f64;

    for ret in returns {
        equity *= 1.0 + ret / 100.0;
        if equity > peak {
            peak = equity;
        }
        let dd = peak - equity;
        if dd > max_dd {
            max_dd = dd;
        }
        let dd_pct = dd / peak * 100.0;
        if dd_pct > max_dd_pct {
            max_dd_pct = dd_pct;
        }
    }

    (max_dd, max_dd_pct)
}

/// Annualized return/volatility ratio over per-trade returns. Defined only
/// when more than one trade exists and the population standard deviation is
/// nonzero.
fn compute_sharpe(returns: &[f64]) -> Option<f64> {
    if returns.len() <= 1 {
        return None;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    if stddev > 0.0 {
        Some(mean / stddev * TRADING_DAYS_PER_YEAR.sqrt())
    } else {
        None
    }
}
