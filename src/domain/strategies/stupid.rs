//! Buys a fixed lot of one random universe symbol every day. Useful as a
//! smoke-test policy, not as advice.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::Rng;

use crate::domain::error::PapertradeError;
use crate::domain::order::{Order, Side};
use crate::domain::strategy::{LedgerView, Strategy};
use crate::domain::universe::Universe;
use crate::ports::price_port::PricePort;

const DAILY_LOT: u32 = 10;

pub struct StupidStrategy {
    rng: StdRng,
}

impl StupidStrategy {
    pub fn new(rng: StdRng) -> Self {
        StupidStrategy { rng }
    }
}

impl Strategy for StupidStrategy {
    fn name(&self) -> &str {
        "stupid"
    }

    fn choose_orders(
        &mut self,
        _view: &LedgerView<'_>,
        universe: &Universe,
        _prices: &dyn PricePort,
        _date: NaiveDate,
    ) -> Result<Vec<Order>, PapertradeError> {
        let symbols = universe.symbols();
        if symbols.is_empty() {
            return Ok(Vec::new());
        }
        let pick = &symbols[self.rng.gen_range(0..symbols.len())];
        Ok(vec![Order::new(pick, DAILY_LOT, Side::Buy)?])
    }
}
