//! Core domain types and logic.

pub mod ast;
pub mod ast_json;
pub mod backtest;
pub mod dsl_parser;
pub mod error;
pub mod evaluator;
pub mod indicator;
pub mod metrics;
pub mod ohlcv;
pub mod sample_data;
pub mod series_ops;
pub mod signal;
pub mod simulator;
pub mod trade;
