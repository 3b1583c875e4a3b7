//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvPriceAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::stderr_sink::StderrSink;
use crate::domain::backtest::{run_backtest, BacktestConfig, BacktestResult};
use crate::domain::error::PapertradeError;
use crate::domain::strategies::{
    BenchmarkStrategy, LinRegStrategy, RandomStrategy, StupidStrategy,
};
use crate::domain::strategy::Strategy;
use crate::domain::universe::{parse_symbols, Universe};
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;

#[derive(Parser, Debug)]
#[command(name = "papertrade", about = "Day-stepping equity backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest against the configured universe
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Override the [strategy] name from the config file
        #[arg(short, long)]
        strategy: Option<String>,
        /// Seed for the randomized strategies; unseeded runs differ per run
        #[arg(long)]
        seed: Option<u64>,
        /// Only print warnings and the final summary
        #[arg(short, long)]
        quiet: bool,
    },
    /// Probe the configured universe and report admitted/skipped symbols
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the available data range for a symbol
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: String,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Backtest {
            config,
            strategy,
            seed,
            quiet,
        } => run_backtest_command(&config, strategy.as_deref(), seed, quiet),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, symbol } => run_info(&config, &symbol),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(&err)
        }
    }
}

/// Everything a run needs, pulled out of the INI file.
#[derive(Debug, Clone)]
pub struct Settings {
    pub backtest: BacktestConfig,
    pub symbols: Vec<String>,
    pub strategy_name: String,
    pub rebalance_days: i64,
    pub data_path: PathBuf,
}

pub fn load_settings(config: &dyn ConfigPort) -> Result<Settings, PapertradeError> {
    let start_date = require_date(config, "backtest", "start_date")?;
    let end_date = require_date(config, "backtest", "end_date")?;
    if end_date <= start_date {
        return Err(PapertradeError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "end_date".to_string(),
            reason: format!("end date {end_date} is not after start date {start_date}"),
        });
    }

    let starting_cash = config.get_double("backtest", "starting_cash", 0.0);
    if starting_cash <= 0.0 {
        return Err(PapertradeError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "starting_cash".to_string(),
            reason: format!("must be positive, got {starting_cash}"),
        });
    }

    let benchmark_symbol = config
        .get_string("backtest", "benchmark")
        .unwrap_or_else(|| "VOO".to_string())
        .to_uppercase();

    let symbols = parse_symbols(&require_string(config, "universe", "symbols")?)?;

    let strategy_name = config
        .get_string("strategy", "name")
        .unwrap_or_else(|| "benchmark".to_string())
        .to_lowercase();

    let data_path = PathBuf::from(require_string(config, "data", "prices")?);

    Ok(Settings {
        backtest: BacktestConfig {
            start_date,
            end_date,
            starting_cash,
            benchmark_symbol,
        },
        symbols,
        strategy_name,
        rebalance_days: config.get_int("strategy", "rebalance_days", 3),
        data_path,
    })
}

fn require_string(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<String, PapertradeError> {
    config
        .get_string(section, key)
        .ok_or_else(|| PapertradeError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        })
}

fn require_date(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<NaiveDate, PapertradeError> {
    let raw = require_string(config, section, key)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| PapertradeError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: format!("expected YYYY-MM-DD, got {raw}: {e}"),
    })
}

pub fn build_strategy(settings: &Settings, seed: Option<u64>) -> Result<Box<dyn Strategy>, PapertradeError> {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    Ok(match settings.strategy_name.as_str() {
        "stupid" => Box::new(StupidStrategy::new(rng)),
        "random" => Box::new(RandomStrategy::new(rng)),
        "benchmark" => Box::new(BenchmarkStrategy::new(&settings.backtest.benchmark_symbol)),
        "linreg" => Box::new(LinRegStrategy::new(
            settings.backtest.start_date,
            settings.rebalance_days,
        )),
        other => {
            return Err(PapertradeError::ConfigInvalid {
                section: "strategy".to_string(),
                key: "name".to_string(),
                reason: format!(
                    "unknown strategy {other}, expected stupid, random, benchmark or linreg"
                ),
            })
        }
    })
}

/// Probe every configured symbol, warning and skipping the ones that fail,
/// as long as at least one survives.
pub fn build_universe(
    prices: &dyn PricePort,
    symbols: &[String],
) -> Result<Universe, PapertradeError> {
    let mut universe = Universe::new();
    for symbol in symbols {
        match universe.add(prices, symbol) {
            Ok(()) => eprintln!("  {symbol}: admitted"),
            Err(err) => eprintln!("Warning: skipping {symbol} ({err})"),
        }
    }

    if universe.is_empty() {
        return Err(PapertradeError::InvalidSymbol {
            symbol: symbols.join(","),
            reason: "no configured symbol passed the data probe".to_string(),
        });
    }
    Ok(universe)
}

fn run_backtest_command(
    config_path: &PathBuf,
    strategy_override: Option<&str>,
    seed: Option<u64>,
    quiet: bool,
) -> Result<(), PapertradeError> {
    let config = load_config(config_path)?;
    let mut settings = load_settings(&config)?;
    if let Some(name) = strategy_override {
        settings.strategy_name = name.to_lowercase();
    }

    let prices = CsvPriceAdapter::new(settings.data_path.clone());
    let universe = build_universe(&prices, &settings.symbols)?;
    let strategy = build_strategy(&settings, seed)?;
    let mut sink = StderrSink::new(quiet);

    let result = run_backtest(&prices, &universe, strategy, &settings.backtest, &mut sink)?;
    print_result(&result, &settings);
    Ok(())
}

fn print_result(result: &BacktestResult, settings: &Settings) {
    println!(
        "{:<12} {:>14} {:>14} {:>14} {:>14}",
        "date", "value", "profit", "bench value", "bench profit"
    );
    for record in &result.records {
        println!(
            "{:<12} {:>14.2} {:>14.2} {:>14.2} {:>14.2}",
            record.date.to_string(),
            record.account.current_valuation,
            record.account.total_profit,
            record.benchmark.current_valuation,
            record.benchmark.total_profit,
        );
    }

    if let Some(last) = result.final_record() {
        println!();
        println!(
            "{}: final value {:.2}, profit {:.2} on {:.2} invested ({} trading days)",
            result.strategy_name,
            last.account.current_valuation,
            last.account.total_profit,
            last.account.amount_invested,
            result.records.len(),
        );
        println!(
            "benchmark ({}): final value {:.2}, profit {:.2}",
            settings.backtest.benchmark_symbol,
            last.benchmark.current_valuation,
            last.benchmark.total_profit,
        );
    } else {
        println!("no trading days in range");
    }
}

fn run_validate(config_path: &PathBuf) -> Result<(), PapertradeError> {
    let config = load_config(config_path)?;
    let settings = load_settings(&config)?;
    let prices = CsvPriceAdapter::new(settings.data_path.clone());

    let universe = build_universe(&prices, &settings.symbols)?;
    println!(
        "{} of {} symbols admitted: {}",
        universe.count(),
        settings.symbols.len(),
        universe.symbols().join(", ")
    );
    Ok(())
}

fn run_info(config_path: &PathBuf, symbol: &str) -> Result<(), PapertradeError> {
    let config = load_config(config_path)?;
    let settings = load_settings(&config)?;
    let prices = CsvPriceAdapter::new(settings.data_path.clone());

    match prices.data_range(symbol)? {
        Some((first, last, bars)) => {
            println!("{}: {} bars from {} to {}", symbol.to_uppercase(), bars, first, last)
        }
        None => println!("{}: no data", symbol.to_uppercase()),
    }
    Ok(())
}

fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, PapertradeError> {
    FileConfigAdapter::from_file(path).map_err(|e| PapertradeError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}
