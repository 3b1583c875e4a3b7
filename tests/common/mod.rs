#![allow(dead_code)]

use chrono::NaiveDate;
use papertrade::domain::error::PapertradeError;
pub use papertrade::domain::ohlcv::OhlcvBar;
use papertrade::ports::price_port::PricePort;
use std::collections::HashMap;

/// In-memory price port with injectable per-symbol errors.
pub struct MockPricePort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockPricePort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl PricePort for MockPricePort {
    fn fetch_ohlc(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, PapertradeError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(PapertradeError::PriceSource {
                reason: reason.clone(),
            });
        }
        let mut bars: Vec<OhlcvBar> = self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start && b.date <= end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(symbol: &str, date_str: &str, open: f64) -> OhlcvBar {
    OhlcvBar {
        symbol: symbol.to_string(),
        date: NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        open,
        high: open + 1.0,
        low: open - 2.0,
        close: open - 0.5,
        volume: 1000,
    }
}

/// Opening prices for the first December 2019 trading week plus Monday the
/// 9th, the fixture dates the accounting scenarios are written against.
pub fn december_fixture() -> MockPricePort {
    MockPricePort::new()
        .with_bars(
            "AAPL",
            vec![
                make_bar("AAPL", "2019-12-02", 267.269989),
                make_bar("AAPL", "2019-12-03", 258.309998),
                make_bar("AAPL", "2019-12-04", 261.070007),
                make_bar("AAPL", "2019-12-05", 263.790009),
                make_bar("AAPL", "2019-12-06", 267.480011),
                make_bar("AAPL", "2019-12-09", 270.000000),
            ],
        )
        .with_bars(
            "AMZN",
            vec![
                make_bar("AMZN", "2019-12-02", 1804.400024),
                make_bar("AMZN", "2019-12-03", 1760.000000),
                make_bar("AMZN", "2019-12-04", 1774.010010),
                make_bar("AMZN", "2019-12-05", 1763.500000),
                make_bar("AMZN", "2019-12-06", 1751.199951),
                make_bar("AMZN", "2019-12-09", 1750.660034),
            ],
        )
        .with_bars(
            "VOO",
            vec![
                make_bar("VOO", "2019-12-02", 283.959991),
                make_bar("VOO", "2019-12-03", 281.119995),
                make_bar("VOO", "2019-12-04", 283.329987),
                make_bar("VOO", "2019-12-05", 284.700012),
                make_bar("VOO", "2019-12-06", 286.899994),
                make_bar("VOO", "2019-12-09", 287.100006),
            ],
        )
}
