//! Backtest runner: steps a strategy and a buy-and-hold benchmark through
//! every weekday of a date range, collecting one account record per day.

use chrono::NaiveDate;

use super::calendar::weekdays_between;
use super::error::PapertradeError;
use super::ledger::AccountSnapshot;
use super::strategies::BenchmarkStrategy;
use super::strategy::{Session, Strategy};
use super::universe::Universe;
use crate::ports::event_port::EventSink;
use crate::ports::price_port::PricePort;

#[derive(Debug, Clone)]
pub struct BacktestConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub starting_cash: f64,
    pub benchmark_symbol: String,
}

/// One trading day's outcome for the strategy and its benchmark.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub account: AccountSnapshot,
    pub benchmark: AccountSnapshot,
}

/// The complete artifact of a run, consumed by reporting.
#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub strategy_name: String,
    pub records: Vec<DailyRecord>,
}

impl BacktestResult {
    pub fn final_record(&self) -> Option<&DailyRecord> {
        self.records.last()
    }
}

/// Run `strategy` over every weekday in `[start_date, end_date)`, with a
/// benchmark session holding `benchmark_symbol` run in lockstep on the same
/// starting cash and universe.
///
/// Weekends are filtered here, so the sessions never see a non-trading day;
/// any error that does surface from a day's play is a real failure and
/// aborts the run.
pub fn run_backtest(
    prices: &dyn PricePort,
    universe: &Universe,
    strategy: Box<dyn Strategy>,
    config: &BacktestConfig,
    sink: &mut dyn EventSink,
) -> Result<BacktestResult, PapertradeError> {
    let mut session = Session::new(config.starting_cash, universe.clone(), strategy);
    let mut benchmark = Session::new(
        config.starting_cash,
        universe.clone(),
        Box::new(BenchmarkStrategy::new(&config.benchmark_symbol)),
    );

    let strategy_name = session.strategy_name().to_string();
    let mut records = Vec::new();

    for date in weekdays_between(config.start_date, config.end_date) {
        let account = session.play(prices, sink, date)?;
        let bench = benchmark.play(prices, sink, date)?;
        records.push(DailyRecord {
            date,
            account,
            benchmark: bench,
        });
    }

    Ok(BacktestResult {
        strategy_name,
        records,
    })
}
