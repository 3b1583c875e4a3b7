//! Event sink port trait.
//!
//! The engine reports what happened to each order through an injected sink
//! rather than a process-wide logger, so a run can be silenced, captured in
//! tests, or wired to real output without touching the core.

use chrono::NaiveDate;

use crate::domain::ledger::AccountSnapshot;
use crate::domain::order::Order;

pub trait EventSink {
    fn order_executed(&mut self, date: NaiveDate, order: &Order, price: f64);
    fn order_skipped(&mut self, date: NaiveDate, order: &Order, reason: &str);
    fn day_played(&mut self, date: NaiveDate, snapshot: &AccountSnapshot);
}

/// Discards everything. For callers that only want the returned records.
pub struct NullSink;

impl EventSink for NullSink {
    fn order_executed(&mut self, _date: NaiveDate, _order: &Order, _price: f64) {}
    fn order_skipped(&mut self, _date: NaiveDate, _order: &Order, _reason: &str) {}
    fn day_played(&mut self, _date: NaiveDate, _snapshot: &AccountSnapshot) {}
}
