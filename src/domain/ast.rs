//! Strategy AST data structures.
//!
//! This module defines the abstract syntax tree for trading strategies:
//! - `SeriesName`: the five OHLCV price columns
//! - `IndicatorKind` / `FunctionKind`: enumerated callables, resolved once
//!   at AST construction and never re-parsed from strings at evaluation time
//! - `CompareOp` / `BoolOp`: comparison and conjunction operators
//! - `Expr`: the expression tree
//! - `Strategy`: entry/exit rule pair, at least one side present

use crate::domain::error::StratlangError;
use crate::domain::ohlcv::OhlcvBar;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesName {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl SeriesName {
    pub fn parse(name: &str) -> Result<Self, StratlangError> {
        match name {
            "open" => Ok(SeriesName::Open),
            "high" => Ok(SeriesName::High),
            "low" => Ok(SeriesName::Low),
            "close" => Ok(SeriesName::Close),
            "volume" => Ok(SeriesName::Volume),
            _ => Err(StratlangError::UnknownColumn { name: name.into() }),
        }
    }

    /// Extract this column from a bar table as an f64 series.
    pub fn column(&self, bars: &[OhlcvBar]) -> Vec<f64> {
        bars.iter()
            .map(|b| match self {
                SeriesName::Open => b.open,
                SeriesName::High => b.high,
                SeriesName::Low => b.low,
                SeriesName::Close => b.close,
                SeriesName::Volume => b.volume as f64,
            })
            .collect()
    }
}

impl fmt::Display for SeriesName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SeriesName::Open => "open",
            SeriesName::High => "high",
            SeriesName::Low => "low",
            SeriesName::Close => "close",
            SeriesName::Volume => "volume",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    Sma,
    Ema,
    Rsi,
}

impl IndicatorKind {
    pub fn parse(name: &str) -> Result<Self, StratlangError> {
        match name {
            "sma" => Ok(IndicatorKind::Sma),
            "ema" => Ok(IndicatorKind::Ema),
            "rsi" => Ok(IndicatorKind::Rsi),
            _ => Err(StratlangError::UnknownIndicator { name: name.into() }),
        }
    }

    /// Period substituted when the DSL omits the second argument.
    pub fn default_period(&self) -> usize {
        match self {
            IndicatorKind::Sma | IndicatorKind::Ema => 20,
            IndicatorKind::Rsi => 14,
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IndicatorKind::Sma => "sma",
            IndicatorKind::Ema => "ema",
            IndicatorKind::Rsi => "rsi",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Yesterday,
    LastWeek,
    NDaysAgo,
    Change,
    PercentChange,
    CrossesAbove,
    CrossesBelow,
}

impl FunctionKind {
    pub fn parse(name: &str) -> Result<Self, StratlangError> {
        match name {
            "yesterday" => Ok(FunctionKind::Yesterday),
            "last_week" => Ok(FunctionKind::LastWeek),
            "n_days_ago" => Ok(FunctionKind::NDaysAgo),
            "change" => Ok(FunctionKind::Change),
            "percent_change" => Ok(FunctionKind::PercentChange),
            "crosses_above" => Ok(FunctionKind::CrossesAbove),
            "crosses_below" => Ok(FunctionKind::CrossesBelow),
            _ => Err(StratlangError::UnknownOperator { name: name.into() }),
        }
    }
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FunctionKind::Yesterday => "yesterday",
            FunctionKind::LastWeek => "last_week",
            FunctionKind::NDaysAgo => "n_days_ago",
            FunctionKind::Change => "change",
            FunctionKind::PercentChange => "percent_change",
            FunctionKind::CrossesAbove => "crosses_above",
            FunctionKind::CrossesBelow => "crosses_below",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
    Ne,
    CrossesAbove,
    CrossesBelow,
}

impl CompareOp {
    pub fn parse(symbol: &str) -> Result<Self, StratlangError> {
        match symbol {
            ">" => Ok(CompareOp::Gt),
            "<" => Ok(CompareOp::Lt),
            ">=" => Ok(CompareOp::Ge),
            "<=" => Ok(CompareOp::Le),
            "==" => Ok(CompareOp::Eq),
            "!=" => Ok(CompareOp::Ne),
            "crosses_above" => Ok(CompareOp::CrossesAbove),
            "crosses_below" => Ok(CompareOp::CrossesBelow),
            _ => Err(StratlangError::UnknownOperator {
                name: symbol.into(),
            }),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Ge => ">=",
            CompareOp::Le => "<=",
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::CrossesAbove => "crosses_above",
            CompareOp::CrossesBelow => "crosses_below",
        };
        write!(f, "{}", symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolOp {
    And,
    Or,
}

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoolOp::And => write!(f, "AND"),
            BoolOp::Or => write!(f, "OR"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Series(SeriesName),
    Indicator {
        kind: IndicatorKind,
        series: SeriesName,
        period: usize,
    },
    FunctionCall {
        kind: FunctionKind,
        args: Vec<Expr>,
    },
    BinaryOp {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    BooleanOp {
        op: BoolOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Bare numeric literal. Integer-valued literals keep a whole value so
    /// the JSON interchange can render them without a fractional part.
    Number(f64),
    /// Numeric literal written with a trailing `%`. Carries the same value
    /// as a bare number; the suffix has no distinct runtime effect.
    Percent(f64),
}

/// A parsed strategy: entry and/or exit rule trees. The parser guarantees
/// at least one side is present.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Strategy {
    pub entry: Option<Expr>,
    pub exit: Option<Expr>,
}
