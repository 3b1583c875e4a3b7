//! Price data access port trait.

use chrono::{Duration, NaiveDate};

use crate::domain::error::PapertradeError;
use crate::domain::ohlcv::OhlcvBar;

/// Daily price data for a set of symbols. Implementations may be a local
/// cache or a live feed; the engine never distinguishes them.
pub trait PricePort {
    /// Bars for `symbol` in `[start, end]`, sorted by date. Days without
    /// data simply produce no row.
    fn fetch_ohlc(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, PapertradeError>;

    /// The open price on exactly `date`, `NoData` if the market produced no
    /// bar that day. Trades always execute against this.
    fn open_price(&self, symbol: &str, date: NaiveDate) -> Result<f64, PapertradeError> {
        let bars = self.fetch_ohlc(symbol, date, date)?;
        bars.iter()
            .find(|bar| bar.date == date)
            .map(|bar| bar.open)
            .ok_or_else(|| PapertradeError::NoData {
                symbol: symbol.to_string(),
                date,
            })
    }

    /// Best-effort open price: the bar closest to `date` within a week
    /// either side. `NoData` only when the whole fortnight is empty. Used
    /// by probing and reporting paths, never by trade execution.
    fn nearest_open_price(&self, symbol: &str, date: NaiveDate) -> Result<f64, PapertradeError> {
        let bars = self.fetch_ohlc(symbol, date - Duration::days(7), date + Duration::days(7))?;
        bars.iter()
            .min_by_key(|bar| (bar.date - date).num_days().abs())
            .map(|bar| bar.open)
            .ok_or_else(|| PapertradeError::NoData {
                symbol: symbol.to_string(),
                date,
            })
    }
}
