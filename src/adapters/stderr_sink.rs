//! Event sink that narrates a run to stderr.

use chrono::NaiveDate;

use crate::domain::ledger::AccountSnapshot;
use crate::domain::order::Order;
use crate::ports::event_port::EventSink;

/// Prints one line per event. `quiet` drops the per-day account summary and
/// keeps only skipped-order warnings.
pub struct StderrSink {
    quiet: bool,
}

impl StderrSink {
    pub fn new(quiet: bool) -> Self {
        StderrSink { quiet }
    }
}

impl EventSink for StderrSink {
    fn order_executed(&mut self, date: NaiveDate, order: &Order, price: f64) {
        if !self.quiet {
            eprintln!(
                "{date}: {} {} {} at {:.2}",
                order.side, order.quantity, order.symbol, price
            );
        }
    }

    fn order_skipped(&mut self, date: NaiveDate, order: &Order, reason: &str) {
        eprintln!(
            "Warning: {date}: skipped {} {} {} ({reason})",
            order.side, order.quantity, order.symbol
        );
    }

    fn day_played(&mut self, date: NaiveDate, snapshot: &AccountSnapshot) {
        if !self.quiet {
            eprintln!(
                "{date}: value {:.2}, profit {:.2}, cash {:.2}, held [{}]",
                snapshot.current_valuation,
                snapshot.total_profit,
                snapshot.cash_in_hand,
                snapshot.symbols_held.join(", ")
            );
        }
    }
}
