//! Strategy evaluation engine.
//!
//! Interprets a [`Strategy`] AST against a bar table and produces the
//! aligned boolean entry/exit columns.
//!
//! # Evaluation semantics
//!
//! - Expressions evaluate bottom-up into either a numeric series (NaN marks
//!   undefined values) or a boolean series.
//! - Comparisons with an undefined operand are false, including `!=`:
//!   undefined never compares true in any boolean context.
//! - A numeric series coerces to boolean as `v != 0` (NaN is false); a
//!   boolean series coerces to numeric as 1.0/0.0.
//! - An absent entry or exit rule produces an all-false column.
//!
//! Every AST variant is matched exhaustively; the operator and function
//! kinds were resolved during AST construction, so no string dispatch
//! happens here.

use crate::domain::ast::{BoolOp, CompareOp, Expr, FunctionKind, Strategy};
use crate::domain::error::StratlangError;
use crate::domain::indicator;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::series_ops;
use crate::domain::signal::SignalTable;

/// Intermediate result of evaluating one expression node.
enum Evaluated {
    Num(Vec<f64>),
    Bool(Vec<bool>),
}

impl Evaluated {
    fn into_bools(self) -> Vec<bool> {
        match self {
            Evaluated::Bool(values) => values,
            Evaluated::Num(values) => values
                .into_iter()
                .map(|v| !v.is_nan() && v != 0.0)
                .collect(),
        }
    }

    fn into_nums(self) -> Vec<f64> {
        match self {
            Evaluated::Num(values) => values,
            Evaluated::Bool(values) => values
                .into_iter()
                .map(|b| if b { 1.0 } else { 0.0 })
                .collect(),
        }
    }
}

/// Evaluate both sides of a strategy against a bar table.
pub fn evaluate(strategy: &Strategy, bars: &[OhlcvBar]) -> Result<SignalTable, StratlangError> {
    let entry = match &strategy.entry {
        Some(expr) => eval_expr(expr, bars)?.into_bools(),
        None => vec![false; bars.len()],
    };
    let exit = match &strategy.exit {
        Some(expr) => eval_expr(expr, bars)?.into_bools(),
        None => vec![false; bars.len()],
    };
    Ok(SignalTable { entry, exit })
}

fn eval_expr(expr: &Expr, bars: &[OhlcvBar]) -> Result<Evaluated, StratlangError> {
    match expr {
        Expr::Series(name) => Ok(Evaluated::Num(name.column(bars))),
        Expr::Indicator {
            kind,
            series,
            period,
        } => {
            let input = series.column(bars);
            Ok(Evaluated::Num(indicator::calculate(*kind, &input, *period)))
        }
        Expr::FunctionCall { kind, args } => eval_function(*kind, args, bars),
        Expr::BinaryOp { op, left, right } => {
            let lhs = eval_expr(left, bars)?.into_nums();
            let rhs = eval_expr(right, bars)?.into_nums();
            Ok(Evaluated::Bool(apply_compare(*op, &lhs, &rhs)))
        }
        Expr::BooleanOp { op, left, right } => {
            let lhs = eval_expr(left, bars)?.into_bools();
            let rhs = eval_expr(right, bars)?.into_bools();
            let combined = lhs
                .iter()
                .zip(&rhs)
                .map(|(&l, &r)| match op {
                    BoolOp::And => l && r,
                    BoolOp::Or => l || r,
                })
                .collect();
            Ok(Evaluated::Bool(combined))
        }
        Expr::Number(value) | Expr::Percent(value) => {
            Ok(Evaluated::Num(vec![*value; bars.len()]))
        }
    }
}

fn eval_function(
    kind: FunctionKind,
    args: &[Expr],
    bars: &[OhlcvBar],
) -> Result<Evaluated, StratlangError> {
    match kind {
        FunctionKind::Yesterday | FunctionKind::LastWeek => {
            require_args(kind, "at least 1", args.len() >= 1, args.len())?;
            let input = eval_expr(&args[0], bars)?.into_nums();
            let offset = if kind == FunctionKind::Yesterday { 1 } else { 7 };
            Ok(Evaluated::Num(series_ops::shift(&input, offset)))
        }
        FunctionKind::NDaysAgo => {
            require_args(kind, "exactly 2", args.len() == 2, args.len())?;
            let input = eval_expr(&args[0], bars)?.into_nums();
            let offset = literal_offset(&args[1])?;
            Ok(Evaluated::Num(series_ops::shift(&input, offset)))
        }
        FunctionKind::Change | FunctionKind::PercentChange => {
            require_args(kind, "at least 1", args.len() >= 1, args.len())?;
            let input = eval_expr(&args[0], bars)?.into_nums();
            let n = match args.get(1) {
                Some(arg) => literal_offset(arg)?,
                None => 1,
            };
            let out = if kind == FunctionKind::Change {
                series_ops::change(&input, n)
            } else {
                series_ops::percent_change(&input, n)
            };
            Ok(Evaluated::Num(out))
        }
        FunctionKind::CrossesAbove | FunctionKind::CrossesBelow => {
            require_args(kind, "exactly 2", args.len() == 2, args.len())?;
            let lhs = eval_expr(&args[0], bars)?.into_nums();
            let rhs = eval_expr(&args[1], bars)?.into_nums();
            let out = if kind == FunctionKind::CrossesAbove {
                series_ops::crosses_above(&lhs, &rhs)
            } else {
                series_ops::crosses_below(&lhs, &rhs)
            };
            Ok(Evaluated::Bool(out))
        }
    }
}

fn require_args(
    kind: FunctionKind,
    expected: &str,
    ok: bool,
    got: usize,
) -> Result<(), StratlangError> {
    if ok {
        Ok(())
    } else {
        Err(StratlangError::Arity {
            function: kind.to_string(),
            expected: expected.into(),
            got,
        })
    }
}

/// A lag/window count must be a non-negative whole-number literal.
fn literal_offset(expr: &Expr) -> Result<usize, StratlangError> {
    match expr {
        Expr::Number(v) | Expr::Percent(v) => {
            if *v >= 0.0 && v.fract() == 0.0 {
                Ok(*v as usize)
            } else {
                Err(StratlangError::InvalidLiteral {
                    value: v.to_string(),
                })
            }
        }
        _ => Err(StratlangError::InvalidLiteral {
            value: "expected a numeric offset".into(),
        }),
    }
}

fn apply_compare(op: CompareOp, lhs: &[f64], rhs: &[f64]) -> Vec<bool> {
    match op {
        CompareOp::CrossesAbove => series_ops::crosses_above(lhs, rhs),
        CompareOp::CrossesBelow => series_ops::crosses_below(lhs, rhs),
        _ => lhs
            .iter()
            .zip(rhs)
            .map(|(&l, &r)| {
                if l.is_nan() || r.is_nan() {
                    return false;
                }
                match op {
                    CompareOp::Gt => l > r,
                    CompareOp::Lt => l < r,
                    CompareOp::Ge => l >= r,
                    CompareOp::Le => l <= r,
                    CompareOp::Eq => l == r,
                    CompareOp::Ne => l != r,
                    CompareOp::CrossesAbove | CompareOp::CrossesBelow => unreachable!(),
                }
            })
            .collect(),
    }
}
