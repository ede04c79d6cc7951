//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::ast::{SeriesName, Strategy};
use crate::domain::ast_json;
use crate::domain::backtest::{BacktestConfig, DEFAULT_INITIAL_CAPITAL};
use crate::domain::dsl_parser;
use crate::domain::error::StratlangError;
use crate::domain::evaluator;
use crate::domain::metrics::BacktestResult;
use crate::domain::sample_data::{self, SampleDataConfig};
use crate::domain::simulator;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "stratlang", about = "Trading-rule DSL compiler and backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a strategy against a bar table
    Backtest {
        /// Strategy rule file (DSL text)
        #[arg(short, long)]
        strategy: PathBuf,
        /// OHLCV bar table (CSV)
        #[arg(short, long)]
        data: PathBuf,
        /// Optional INI config with a [backtest] section
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Emit the result as JSON instead of a text report
        #[arg(long)]
        json: bool,
    },
    /// Parse a strategy and print its AST as JSON
    Parse {
        #[arg(short, long)]
        strategy: PathBuf,
    },
    /// Check that a strategy file parses
    Validate {
        #[arg(short, long)]
        strategy: PathBuf,
    },
    /// Write a synthetic OHLCV bar table
    GenerateData {
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, default_value = "2023-01-01")]
        start_date: NaiveDate,
        #[arg(long, default_value = "2023-12-31")]
        end_date: NaiveDate,
        #[arg(long, default_value_t = 100.0)]
        initial_price: f64,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            strategy,
            data,
            config,
            json,
        } => run_backtest(&strategy, &data, config.as_ref(), json),
        Command::Parse { strategy } => run_parse(&strategy),
        Command::Validate { strategy } => run_validate(&strategy),
        Command::GenerateData {
            output,
            start_date,
            end_date,
            initial_price,
            seed,
        } => run_generate_data(&output, start_date, end_date, initial_price, seed),
    }
}

fn fail(err: &StratlangError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

fn load_strategy(path: &PathBuf) -> Result<Strategy, ExitCode> {
    let text = fs::read_to_string(path).map_err(|e| {
        let err = StratlangError::Io(e);
        fail(&err)
    })?;

    dsl_parser::parse(&text).map_err(|e| {
        eprintln!(
            "error: failed to parse {}:\n{}",
            path.display(),
            e.display_with_context(text.trim_end())
        );
        let err: StratlangError = e.into();
        (&err).into()
    })
}

pub fn build_backtest_config(
    adapter: &dyn ConfigPort,
) -> Result<BacktestConfig, StratlangError> {
    let column = |key: &str, default: SeriesName| -> Result<SeriesName, StratlangError> {
        match adapter.get_string("backtest", key) {
            Some(value) => {
                SeriesName::parse(&value).map_err(|_| StratlangError::Config {
                    reason: format!("invalid {}: '{}' is not a bar column", key, value),
                })
            }
            None => Ok(default),
        }
    };

    Ok(BacktestConfig {
        initial_capital: adapter.get_double("backtest", "initial_capital", DEFAULT_INITIAL_CAPITAL),
        entry_price_field: column("entry_price_column", SeriesName::Close)?,
        exit_price_field: column("exit_price_column", SeriesName::Close)?,
    })
}

fn run_backtest(
    strategy_path: &PathBuf,
    data_path: &PathBuf,
    config_path: Option<&PathBuf>,
    json: bool,
) -> ExitCode {
    let strategy = match load_strategy(strategy_path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let bt_config = match config_path {
        Some(path) => {
            let adapter = match FileConfigAdapter::from_file(path) {
                Ok(a) => a,
                Err(e) => return fail(&e),
            };
            match build_backtest_config(&adapter) {
                Ok(c) => c,
                Err(e) => return fail(&e),
            }
        }
        None => BacktestConfig::default(),
    };

    let bars = match CsvAdapter::new().load_bars(data_path) {
        Ok(b) => b,
        Err(e) => return fail(&e),
    };
    eprintln!("Loaded {} bars from {}", bars.len(), data_path.display());

    let signals = match evaluator::evaluate(&strategy, &bars) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    let result = match simulator::run(&bars, &signals, &bt_config) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };

    if json {
        match serde_json::to_string_pretty(&result) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                let err = StratlangError::Data {
                    reason: format!("failed to serialize result: {}", e),
                };
                return fail(&err);
            }
        }
    } else {
        print_report(&result, &bt_config);
    }

    ExitCode::SUCCESS
}

fn print_report(result: &BacktestResult, config: &BacktestConfig) {
    println!("Backtest result");
    println!("  Initial capital:  {:.2}", config.initial_capital);
    println!("  Trades:           {}", result.num_trades);
    println!(
        "  Total return:     {:.2} ({:.2}%)",
        result.total_return, result.total_return_pct
    );
    println!(
        "  Max drawdown:     {:.2} ({:.2}%)",
        result.max_drawdown, result.max_drawdown_pct
    );
    println!("  Win rate:         {:.1}%", result.win_rate * 100.0);
    println!("  Avg return:       {:.2}%", result.avg_return);
    match result.sharpe_ratio {
        Some(sharpe) => println!("  Sharpe ratio:     {:.2}", sharpe),
        None => println!("  Sharpe ratio:     n/a"),
    }

    if !result.trades.is_empty() {
        println!();
        println!("  {:<12} {:<12} {:>10} {:>10} {:>10}", "entry", "exit", "in", "out", "pnl");
        for trade in &result.trades {
            println!(
                "  {:<12} {:<12} {:>10.2} {:>10.2} {:>10.2}",
                trade.entry_date, trade.exit_date, trade.entry_price, trade.exit_price, trade.pnl
            );
        }
    }
}

fn run_parse(strategy_path: &PathBuf) -> ExitCode {
    let strategy = match load_strategy(strategy_path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let value = ast_json::to_json(&strategy);
    match serde_json::to_string_pretty(&value) {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => fail(&StratlangError::Data {
            reason: format!("failed to serialize AST: {}", e),
        }),
    }
}

fn run_validate(strategy_path: &PathBuf) -> ExitCode {
    match load_strategy(strategy_path) {
        Ok(strategy) => {
            let sides = match (&strategy.entry, &strategy.exit) {
                (Some(_), Some(_)) => "entry and exit rules",
                (Some(_), None) => "entry rule only",
                (None, Some(_)) => "exit rule only",
                (None, None) => unreachable!(),
            };
            println!("{}: OK ({})", strategy_path.display(), sides);
            ExitCode::SUCCESS
        }
        Err(code) => code,
    }
}

fn run_generate_data(
    output: &PathBuf,
    start_date: NaiveDate,
    end_date: NaiveDate,
    initial_price: f64,
    seed: u64,
) -> ExitCode {
    if end_date < start_date {
        let err = StratlangError::Config {
            reason: format!("end date {} precedes start date {}", end_date, start_date),
        };
        return fail(&err);
    }

    let bars = sample_data::generate(&SampleDataConfig {
        start_date,
        end_date,
        initial_price,
        seed,
    });

    if let Err(e) = CsvAdapter::new().write_bars(output, &bars) {
        return fail(&e);
    }

    eprintln!("Generated {} bars to {}", bars.len(), output.display());
    ExitCode::SUCCESS
}
