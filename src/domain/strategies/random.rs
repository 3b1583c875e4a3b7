//! Coin-flip strategy: each day randomly buys a universe symbol or sells a
//! held one. Deliberately unprincipled, but it exercises the practical
//! paths a real strategy hits: affordability, empty holdings, data gaps.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::Rng;

use crate::domain::error::PapertradeError;
use crate::domain::order::{Order, Side};
use crate::domain::strategy::{LedgerView, Strategy};
use crate::domain::universe::Universe;
use crate::ports::price_port::PricePort;

const LOT: u32 = 10;

pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    pub fn new(rng: StdRng) -> Self {
        RandomStrategy { rng }
    }
}

impl Strategy for RandomStrategy {
    fn name(&self) -> &str {
        "random"
    }

    fn choose_orders(
        &mut self,
        view: &LedgerView<'_>,
        universe: &Universe,
        prices: &dyn PricePort,
        date: NaiveDate,
    ) -> Result<Vec<Order>, PapertradeError> {
        if self.rng.gen_bool(0.5) {
            // buy leg: pick a random symbol, pass if we clearly cannot
            // afford a lot or its price is unavailable today
            let symbols = universe.symbols();
            if symbols.is_empty() {
                return Ok(Vec::new());
            }
            let pick = &symbols[self.rng.gen_range(0..symbols.len())];
            match prices.open_price(pick, date) {
                Ok(price) if view.cash() > LOT as f64 * price => {
                    Ok(vec![Order::new(pick, LOT, Side::Buy)?])
                }
                _ => Ok(Vec::new()),
            }
        } else {
            // sell leg: pick a random held symbol; lots are only ever
            // bought 10 at a time, so 10 are always sellable
            let held = view.held_symbols();
            if held.is_empty() {
                return Ok(Vec::new());
            }
            let pick = &held[self.rng.gen_range(0..held.len())];
            Ok(vec![Order::new(pick, LOT, Side::Sell)?])
        }
    }
}
