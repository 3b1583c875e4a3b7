//! Factors: black-box scalar signals computed from a symbol's trailing
//! price history. Consumed by strategies, opaque to the engine.

use chrono::NaiveDate;

use super::calendar::n_days_from;
use super::error::PapertradeError;
use crate::ports::price_port::PricePort;

pub trait Factor {
    fn value(
        &self,
        prices: &dyn PricePort,
        symbol: &str,
        end_date: NaiveDate,
    ) -> Result<f64, PapertradeError>;
}

/// Slope of an ordinary least-squares fit of normalized open price against
/// bar index over the trailing window. Positive means the stock has been
/// drifting up.
#[derive(Debug, Clone)]
pub struct LinRegFactor {
    pub window_days: i64,
}

impl Default for LinRegFactor {
    fn default() -> Self {
        LinRegFactor { window_days: 30 }
    }
}

impl Factor for LinRegFactor {
    fn value(
        &self,
        prices: &dyn PricePort,
        symbol: &str,
        end_date: NaiveDate,
    ) -> Result<f64, PapertradeError> {
        let start = n_days_from(end_date, -self.window_days);
        let bars = prices.fetch_ohlc(symbol, start, end_date)?;
        if bars.len() < 2 {
            return Err(PapertradeError::NoData {
                symbol: symbol.to_string(),
                date: end_date,
            });
        }

        let first_open = bars[0].open;
        let n = bars.len() as f64;
        let mean_x = (n - 1.0) / 2.0;
        let mean_y = bars.iter().map(|b| b.open / first_open).sum::<f64>() / n;

        let mut covariance = 0.0;
        let mut variance = 0.0;
        for (i, bar) in bars.iter().enumerate() {
            let dx = i as f64 - mean_x;
            covariance += dx * (bar.open / first_open - mean_y);
            variance += dx * dx;
        }

        Ok(covariance / variance)
    }
}

/// Ratio of a short-term to a long-term simple moving average of opens.
/// Above 1.0 the short-term trend leads the long-term one.
#[derive(Debug, Clone)]
pub struct MovingAverageFactor {
    pub short_term: usize,
    pub long_term: usize,
}

impl Default for MovingAverageFactor {
    fn default() -> Self {
        MovingAverageFactor {
            short_term: 20,
            long_term: 100,
        }
    }
}

impl Factor for MovingAverageFactor {
    fn value(
        &self,
        prices: &dyn PricePort,
        symbol: &str,
        end_date: NaiveDate,
    ) -> Result<f64, PapertradeError> {
        // calendar days fetched, trading bars averaged; fetch enough slack
        // to cover weekends
        let start = n_days_from(end_date, -(self.long_term as i64 * 2));
        let bars = prices.fetch_ohlc(symbol, start, end_date)?;
        if bars.len() < self.long_term {
            return Err(PapertradeError::NoData {
                symbol: symbol.to_string(),
                date: end_date,
            });
        }

        let tail = |count: usize| -> f64 {
            let slice = &bars[bars.len() - count..];
            slice.iter().map(|b| b.open).sum::<f64>() / count as f64
        };

        Ok(tail(self.short_term) / tail(self.long_term))
    }
}
