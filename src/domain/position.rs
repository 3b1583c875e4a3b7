//! Per-symbol position tracking: shares held, cost basis, proceeds and
//! mark-to-market valuation.

use chrono::NaiveDate;

use super::error::PapertradeError;
use super::order::{Side, Transaction};
use crate::ports::price_port::PricePort;

/// Accumulated exposure to one symbol. Created lazily by the ledger on the
/// first trade and never destroyed; "closed" just means zero shares held.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    symbol: String,
    quantity_held: u32,
    total_buy_cost: f64,
    total_sell_proceeds: f64,
    current_valuation: f64,
    transactions: Vec<Transaction>,
}

impl Position {
    pub fn new(symbol: &str) -> Self {
        Position {
            symbol: symbol.to_string(),
            quantity_held: 0,
            total_buy_cost: 0.0,
            total_sell_proceeds: 0.0,
            current_valuation: 0.0,
            transactions: Vec::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn quantity_held(&self) -> u32 {
        self.quantity_held
    }

    pub fn total_buy_cost(&self) -> f64 {
        self.total_buy_cost
    }

    pub fn total_sell_proceeds(&self) -> f64 {
        self.total_sell_proceeds
    }

    /// Last computed mark-to-market value of the holding.
    pub fn current_valuation(&self) -> f64 {
        self.current_valuation
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn is_held(&self) -> bool {
        self.quantity_held > 0
    }

    /// Apply one trade at an already-resolved price. A sell larger than the
    /// held quantity fails and leaves every field untouched; a successful
    /// trade also refreshes the valuation at the trade price, so downstream
    /// snapshots see a fresh mark.
    pub fn record_transaction(
        &mut self,
        quantity: u32,
        price: f64,
        date: NaiveDate,
        side: Side,
    ) -> Result<(), PapertradeError> {
        match side {
            Side::Sell => {
                if quantity > self.quantity_held {
                    return Err(PapertradeError::InsufficientHoldings {
                        symbol: self.symbol.clone(),
                        requested: quantity,
                        held: self.quantity_held,
                    });
                }
                self.quantity_held -= quantity;
                self.total_sell_proceeds += quantity as f64 * price;
            }
            Side::Buy => {
                self.quantity_held += quantity;
                self.total_buy_cost += quantity as f64 * price;
            }
        }

        self.transactions.push(Transaction {
            quantity,
            price,
            date,
            side,
        });
        self.current_valuation = self.quantity_held as f64 * price;
        Ok(())
    }

    /// Recompute the mark-to-market valuation at `date`'s open price.
    ///
    /// In strict mode a price-lookup failure propagates. Non-strict keeps
    /// the previous cached valuation, a best-effort mode for reporting
    /// paths where a one-day data gap should not abort the run.
    pub fn revalue(
        &mut self,
        prices: &dyn PricePort,
        date: NaiveDate,
        strict: bool,
    ) -> Result<f64, PapertradeError> {
        match prices.open_price(&self.symbol, date) {
            Ok(price) => {
                self.current_valuation = self.quantity_held as f64 * price;
                Ok(self.current_valuation)
            }
            Err(err) if strict => Err(err),
            Err(_) => Ok(self.current_valuation),
        }
    }
}
