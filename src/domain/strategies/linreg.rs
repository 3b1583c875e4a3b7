//! Periodic rebalancer driven by the linear-regression factor. Every
//! `rebalance_days` it enters a sell phase that liquidates positions with
//! more than 5% of gain over cost, and the following day buys the
//! top-slope symbol with all cash.

use chrono::NaiveDate;

use crate::domain::error::PapertradeError;
use crate::domain::factor::{Factor, LinRegFactor};
use crate::domain::order::{Order, Side};
use crate::domain::strategy::{LedgerView, Strategy};
use crate::domain::universe::Universe;
use crate::ports::price_port::PricePort;

pub const DEFAULT_REBALANCE_DAYS: i64 = 3;
const PROFIT_TAKE_RATIO: f64 = 1.05;

pub struct LinRegStrategy {
    start_date: NaiveDate,
    rebalance_days: i64,
    factor: LinRegFactor,
    sell_flag: bool,
    buy_flag: bool,
}

impl LinRegStrategy {
    pub fn new(start_date: NaiveDate, rebalance_days: i64) -> Self {
        LinRegStrategy {
            start_date,
            rebalance_days: rebalance_days.max(1),
            factor: LinRegFactor::default(),
            sell_flag: false,
            buy_flag: false,
        }
    }

    /// The universe symbol with the steepest recent price slope. Symbols
    /// whose factor cannot be computed (thin history) are passed over.
    fn top_symbol(
        &self,
        universe: &Universe,
        prices: &dyn PricePort,
        date: NaiveDate,
    ) -> Option<String> {
        universe
            .symbols()
            .iter()
            .filter_map(|symbol| {
                self.factor
                    .value(prices, symbol, date)
                    .ok()
                    .map(|slope| (symbol.clone(), slope))
            })
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(symbol, _)| symbol)
    }
}

impl Strategy for LinRegStrategy {
    fn name(&self) -> &str {
        "linreg"
    }

    fn choose_orders(
        &mut self,
        view: &LedgerView<'_>,
        universe: &Universe,
        prices: &dyn PricePort,
        date: NaiveDate,
    ) -> Result<Vec<Order>, PapertradeError> {
        let day_diff = (date - self.start_date).num_days();
        if day_diff % self.rebalance_days == 0 && !self.sell_flag {
            self.sell_flag = true;
            self.buy_flag = false;
        }

        let mut basket = Vec::new();

        if self.buy_flag {
            if let Some(symbol) = self.top_symbol(universe, prices, date) {
                let price = prices.open_price(&symbol, date)?;
                let quantity = (view.cash() / price).floor() as u32;
                if quantity > 0 {
                    basket.push(Order::new(&symbol, quantity, Side::Buy)?);
                }
            }
            self.buy_flag = false;
        }

        if self.sell_flag {
            for position in view.positions().filter(|p| p.is_held()) {
                // mark at today's open where possible, stale mark otherwise
                let value = match prices.open_price(position.symbol(), date) {
                    Ok(price) => position.quantity_held() as f64 * price,
                    Err(_) => position.current_valuation(),
                };
                if value / position.total_buy_cost() > PROFIT_TAKE_RATIO {
                    basket.push(Order::new(
                        position.symbol(),
                        position.quantity_held(),
                        Side::Sell,
                    )?);
                }
            }
            self.sell_flag = false;
            self.buy_flag = true;
        }

        Ok(basket)
    }
}
