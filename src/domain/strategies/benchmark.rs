//! Buy-and-hold benchmark: puts all cash into one reference symbol on the
//! first day it is asked, then stays idle for the rest of the run.

use chrono::NaiveDate;

use crate::domain::error::PapertradeError;
use crate::domain::order::{Order, Side};
use crate::domain::strategy::{LedgerView, Strategy};
use crate::domain::universe::Universe;
use crate::ports::price_port::PricePort;

pub const DEFAULT_BENCHMARK: &str = "VOO";

pub struct BenchmarkStrategy {
    symbol: String,
    bought: bool,
}

impl BenchmarkStrategy {
    pub fn new(symbol: &str) -> Self {
        BenchmarkStrategy {
            symbol: symbol.to_uppercase(),
            bought: false,
        }
    }
}

impl Default for BenchmarkStrategy {
    fn default() -> Self {
        BenchmarkStrategy::new(DEFAULT_BENCHMARK)
    }
}

impl Strategy for BenchmarkStrategy {
    fn name(&self) -> &str {
        "benchmark"
    }

    fn choose_orders(
        &mut self,
        view: &LedgerView<'_>,
        _universe: &Universe,
        prices: &dyn PricePort,
        date: NaiveDate,
    ) -> Result<Vec<Order>, PapertradeError> {
        if self.bought {
            return Ok(Vec::new());
        }

        // strict lookup: a benchmark that cannot price its first day is a
        // broken run, not a gap to paper over
        let price = prices.open_price(&self.symbol, date)?;
        let quantity = (view.cash() / price).floor() as u32;
        self.bought = true;
        if quantity == 0 {
            return Ok(Vec::new());
        }
        Ok(vec![Order::new(&self.symbol, quantity, Side::Buy)?])
    }
}
