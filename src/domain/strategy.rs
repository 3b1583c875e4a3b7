//! The strategy seam and the day-stepping session that drives it.

use chrono::NaiveDate;

use super::calendar;
use super::error::PapertradeError;
use super::ledger::{AccountSnapshot, Ledger, RecordOutcome};
use super::order::Order;
use super::position::Position;
use super::universe::Universe;
use crate::ports::event_port::EventSink;
use crate::ports::price_port::PricePort;

/// Read-only window onto the ledger handed to strategies. Strategies decide;
/// only the session mutates.
pub struct LedgerView<'a> {
    ledger: &'a Ledger,
}

impl<'a> LedgerView<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        LedgerView { ledger }
    }

    pub fn cash(&self) -> f64 {
        self.ledger.cash()
    }

    pub fn held_symbols(&self) -> Vec<String> {
        self.ledger.held_symbols()
    }

    pub fn position(&self, symbol: &str) -> Option<&'a Position> {
        self.ledger.position(symbol)
    }

    pub fn positions(&self) -> impl Iterator<Item = &'a Position> {
        self.ledger.positions()
    }
}

/// A daily decision policy. Pure apart from reading prices: any phase flags
/// a variant needs live in the variant itself, never in the ledger.
pub trait Strategy {
    fn name(&self) -> &str;

    /// Propose the day's orders given the current portfolio, universe and
    /// prices. Execution (and the right to refuse an order) belongs to the
    /// session.
    fn choose_orders(
        &mut self,
        view: &LedgerView<'_>,
        universe: &Universe,
        prices: &dyn PricePort,
        date: NaiveDate,
    ) -> Result<Vec<Order>, PapertradeError>;
}

/// One strategy bound to its ledger and universe, stepped one trading day
/// at a time.
pub struct Session {
    ledger: Ledger,
    universe: Universe,
    strategy: Box<dyn Strategy>,
}

impl Session {
    pub fn new(starting_cash: f64, universe: Universe, strategy: Box<dyn Strategy>) -> Self {
        Session {
            ledger: Ledger::new(starting_cash),
            universe,
            strategy,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    /// Simulate one trading day: ask the strategy for its orders, attempt
    /// each against the ledger, and return the end-of-day snapshot.
    ///
    /// Weekends are a hard error; the caller controls the calendar. A failed
    /// or unaffordable order is reported to the sink and the rest of the
    /// day's batch still runs.
    pub fn play(
        &mut self,
        prices: &dyn PricePort,
        sink: &mut dyn EventSink,
        date: NaiveDate,
    ) -> Result<AccountSnapshot, PapertradeError> {
        if !calendar::is_weekday(date) {
            return Err(PapertradeError::NotATradingDay { date });
        }

        let orders = {
            let view = LedgerView::new(&self.ledger);
            self.strategy
                .choose_orders(&view, &self.universe, prices, date)?
        };

        for order in &orders {
            match self.ledger.record(prices, date, order) {
                Ok(RecordOutcome::Executed { price }) => sink.order_executed(date, order, price),
                Ok(RecordOutcome::Skipped(reason)) => {
                    sink.order_skipped(date, order, &reason.to_string())
                }
                Err(err) => sink.order_skipped(date, order, &err.to_string()),
            }
        }

        let snapshot = self.ledger.snapshot(prices, date, false)?;
        sink.day_played(date, &snapshot);
        Ok(snapshot)
    }
}
