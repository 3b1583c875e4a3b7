//! OHLC bar representation.

use chrono::NaiveDate;

/// One day of price data for one symbol. The engine marks positions at the
/// open price.
#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}
