//! Orders and the per-position transaction history.

use chrono::NaiveDate;
use std::fmt;

use super::error::PapertradeError;

/// Which way a trade goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn parse(s: &str) -> Result<Side, PapertradeError> {
        match s.to_lowercase().as_str() {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            other => Err(PapertradeError::InvalidOrder {
                reason: format!("side should be buy or sell, it is {other}"),
            }),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// A proposed trade for one date. Produced by a strategy, consumed
/// immediately by the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub symbol: String,
    pub quantity: u32,
    pub side: Side,
}

impl Order {
    pub fn new(symbol: &str, quantity: u32, side: Side) -> Result<Order, PapertradeError> {
        if quantity == 0 {
            return Err(PapertradeError::InvalidOrder {
                reason: format!("zero-quantity {side} order for {symbol}"),
            });
        }
        Ok(Order {
            symbol: symbol.to_string(),
            quantity,
            side,
        })
    }
}

/// An executed trade, appended to a position's history. Never mutated or
/// removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub quantity: u32,
    pub price: f64,
    pub date: NaiveDate,
    pub side: Side,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_side() {
        assert_eq!(Side::parse("buy").unwrap(), Side::Buy);
        assert_eq!(Side::parse("SELL").unwrap(), Side::Sell);
    }

    #[test]
    fn parse_side_rejects_hold() {
        let err = Side::parse("hold");
        assert!(matches!(err, Err(PapertradeError::InvalidOrder { .. })));
    }

    #[test]
    fn order_rejects_zero_quantity() {
        let err = Order::new("AAPL", 0, Side::Buy);
        assert!(matches!(err, Err(PapertradeError::InvalidOrder { .. })));
    }

    #[test]
    fn order_fields() {
        let order = Order::new("AAPL", 10, Side::Buy).unwrap();
        assert_eq!(order.symbol, "AAPL");
        assert_eq!(order.quantity, 10);
        assert_eq!(order.side, Side::Buy);
    }
}
