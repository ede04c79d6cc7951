//! stratlang — a trading-rule DSL compiler and backtest engine.
//!
//! Strategy text is parsed into a typed AST, evaluated against an OHLCV bar
//! table into per-bar entry/exit signals, and run through a single-position
//! trade simulator that produces a trade log and performance metrics.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
