//! The ledger: owns cash and every position, and is the single source of
//! truth for portfolio state.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::error::PapertradeError;
use super::order::{Order, Side};
use super::position::Position;
use crate::ports::price_port::PricePort;

/// Point-in-time derived view of the ledger. Recomputed on demand, never
/// cached across dates.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSnapshot {
    pub amount_invested: f64,
    pub current_valuation: f64,
    pub total_profit: f64,
    pub cash_in_hand: f64,
    pub symbols_held: Vec<String>,
}

/// What happened to an order handed to [`Ledger::record`].
///
/// An unaffordable buy is an expected outcome of a simulated day, not a
/// failure: it comes back as `Skipped` carrying the reason, and the caller
/// decides to report and move on. Hard errors (overselling, missing price
/// data) still come back as `Err`.
#[derive(Debug, Clone)]
pub enum RecordOutcome {
    Executed { price: f64 },
    Skipped(PapertradeError),
}

/// Cash plus the set of open positions, keyed by symbol. BTreeMap keeps
/// held-symbol listings deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    cash: f64,
    starting_cash: f64,
    positions: BTreeMap<String, Position>,
}

impl Ledger {
    pub fn new(starting_cash: f64) -> Self {
        Ledger {
            cash: starting_cash,
            starting_cash,
            positions: BTreeMap::new(),
        }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    /// Fixed at construction; profit is always measured against this.
    pub fn starting_cash(&self) -> f64 {
        self.starting_cash
    }

    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol)
    }

    pub fn positions(&self) -> impl Iterator<Item = &Position> {
        self.positions.values()
    }

    pub fn held_symbols(&self) -> Vec<String> {
        self.positions
            .values()
            .filter(|p| p.is_held())
            .map(|p| p.symbol().to_string())
            .collect()
    }

    /// Apply one order against cash and position state.
    ///
    /// The price is resolved once up front and the affordability check runs
    /// before anything is touched: a declined buy leaves no trace, not even
    /// a lazily created empty position. The position leg and the cash leg
    /// of an executed order use that same resolved price.
    pub fn record(
        &mut self,
        prices: &dyn PricePort,
        date: NaiveDate,
        order: &Order,
    ) -> Result<RecordOutcome, PapertradeError> {
        let price = prices.open_price(&order.symbol, date)?;
        let amount = price * order.quantity as f64;

        match order.side {
            Side::Buy => {
                if amount > self.cash {
                    return Ok(RecordOutcome::Skipped(PapertradeError::InsufficientCash {
                        symbol: order.symbol.clone(),
                        required: amount,
                        available: self.cash,
                    }));
                }
                self.positions
                    .entry(order.symbol.clone())
                    .or_insert_with(|| Position::new(&order.symbol))
                    .record_transaction(order.quantity, price, date, Side::Buy)?;
                self.cash -= amount;
            }
            Side::Sell => {
                let position = self.positions.get_mut(&order.symbol).ok_or_else(|| {
                    PapertradeError::InsufficientHoldings {
                        symbol: order.symbol.clone(),
                        requested: order.quantity,
                        held: 0,
                    }
                })?;
                position.record_transaction(order.quantity, price, date, Side::Sell)?;
                self.cash += amount;
            }
        }

        Ok(RecordOutcome::Executed { price })
    }

    /// Recompute the account state at `date`: cash plus every position
    /// marked at that day's open. Strictness follows [`Position::revalue`].
    pub fn snapshot(
        &mut self,
        prices: &dyn PricePort,
        date: NaiveDate,
        strict: bool,
    ) -> Result<AccountSnapshot, PapertradeError> {
        let mut valuation = self.cash;
        for position in self.positions.values_mut() {
            valuation += position.revalue(prices, date, strict)?;
        }

        Ok(AccountSnapshot {
            amount_invested: self.starting_cash,
            current_valuation: valuation,
            total_profit: valuation - self.starting_cash,
            cash_in_hand: self.cash,
            symbols_held: self.held_symbols(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::OhlcvBar;
    use approx::assert_relative_eq;
    use std::collections::HashMap;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Map-backed port for ledger tests.
    struct MapPort {
        opens: HashMap<(String, NaiveDate), f64>,
    }

    impl MapPort {
        fn new(entries: &[(&str, NaiveDate, f64)]) -> Self {
            MapPort {
                opens: entries
                    .iter()
                    .map(|(s, d, p)| ((s.to_string(), *d), *p))
                    .collect(),
            }
        }
    }

    impl PricePort for MapPort {
        fn fetch_ohlc(
            &self,
            symbol: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<Vec<OhlcvBar>, PapertradeError> {
            let mut bars: Vec<OhlcvBar> = self
                .opens
                .iter()
                .filter(|((s, d), _)| s == symbol && *d >= start && *d <= end)
                .map(|((s, d), p)| OhlcvBar {
                    symbol: s.clone(),
                    date: *d,
                    open: *p,
                    high: *p,
                    low: *p,
                    close: *p,
                    volume: 0,
                })
                .collect();
            bars.sort_by_key(|b| b.date);
            Ok(bars)
        }
    }

    fn december_port() -> MapPort {
        MapPort::new(&[
            ("AAPL", date(2019, 12, 2), 267.269989),
            ("AAPL", date(2019, 12, 3), 258.309998),
            ("AAPL", date(2019, 12, 4), 261.070007),
            ("AAPL", date(2019, 12, 9), 270.0),
            ("AMZN", date(2019, 12, 3), 1760.0),
            ("AMZN", date(2019, 12, 4), 1774.010010),
            ("AMZN", date(2019, 12, 9), 1750.660034),
        ])
    }

    fn buy(symbol: &str, quantity: u32) -> Order {
        Order::new(symbol, quantity, Side::Buy).unwrap()
    }

    fn sell(symbol: &str, quantity: u32) -> Order {
        Order::new(symbol, quantity, Side::Sell).unwrap()
    }

    #[test]
    fn new_ledger_holds_only_cash() {
        let ledger = Ledger::new(100_000.0);
        assert_relative_eq!(ledger.cash(), 100_000.0);
        assert_relative_eq!(ledger.starting_cash(), 100_000.0);
        assert!(ledger.held_symbols().is_empty());
    }

    #[test]
    fn buy_debits_cash_and_opens_position() {
        let port = december_port();
        let mut ledger = Ledger::new(100_000.0);

        let outcome = ledger
            .record(&port, date(2019, 12, 2), &buy("AAPL", 10))
            .unwrap();
        assert!(matches!(outcome, RecordOutcome::Executed { .. }));
        assert_relative_eq!(ledger.cash(), 97_327.30011, max_relative = 1e-9);
        assert_eq!(ledger.held_symbols(), vec!["AAPL".to_string()]);
        assert_eq!(ledger.position("AAPL").unwrap().quantity_held(), 10);
    }

    #[test]
    fn sell_credits_cash() {
        let port = december_port();
        let mut ledger = Ledger::new(100_000.0);
        ledger
            .record(&port, date(2019, 12, 2), &buy("AAPL", 10))
            .unwrap();

        ledger
            .record(&port, date(2019, 12, 3), &sell("AAPL", 1))
            .unwrap();
        assert_relative_eq!(
            ledger.cash(),
            100_000.0 - 2672.69989 + 258.309998,
            max_relative = 1e-9,
        );
        assert_eq!(ledger.position("AAPL").unwrap().quantity_held(), 9);
    }

    #[test]
    fn unaffordable_buy_is_skipped_without_creating_position() {
        let port = december_port();
        let mut ledger = Ledger::new(1_000.0);

        let outcome = ledger
            .record(&port, date(2019, 12, 3), &buy("AMZN", 10))
            .unwrap();
        match outcome {
            RecordOutcome::Skipped(PapertradeError::InsufficientCash {
                required,
                available,
                ..
            }) => {
                assert_relative_eq!(required, 17_600.0, max_relative = 1e-9);
                assert_relative_eq!(available, 1_000.0);
            }
            other => panic!("expected insufficient-cash skip, got {other:?}"),
        }
        // no partial state: no cash movement, no lazily created position
        assert_relative_eq!(ledger.cash(), 1_000.0);
        assert!(ledger.position("AMZN").is_none());
    }

    #[test]
    fn oversell_leaves_ledger_unchanged() {
        let port = december_port();
        let mut ledger = Ledger::new(100_000.0);
        ledger
            .record(&port, date(2019, 12, 2), &buy("AAPL", 10))
            .unwrap();

        let before = ledger.clone();
        let err = ledger.record(&port, date(2019, 12, 3), &sell("AAPL", 11));
        assert!(matches!(
            err,
            Err(PapertradeError::InsufficientHoldings {
                requested: 11,
                held: 10,
                ..
            })
        ));
        assert_eq!(ledger, before);
    }

    #[test]
    fn sell_of_untraded_symbol_is_insufficient_holdings() {
        let port = december_port();
        let mut ledger = Ledger::new(100_000.0);

        let err = ledger.record(&port, date(2019, 12, 3), &sell("AMZN", 10));
        assert!(matches!(
            err,
            Err(PapertradeError::InsufficientHoldings { held: 0, .. })
        ));
        assert!(ledger.position("AMZN").is_none());
    }

    #[test]
    fn missing_price_aborts_before_any_mutation() {
        let port = december_port();
        let mut ledger = Ledger::new(100_000.0);

        let err = ledger.record(&port, date(2019, 12, 7), &buy("AAPL", 10));
        assert!(matches!(err, Err(PapertradeError::NoData { .. })));
        assert_relative_eq!(ledger.cash(), 100_000.0);
        assert!(ledger.position("AAPL").is_none());
    }

    #[test]
    fn snapshot_reports_two_position_account() {
        let port = december_port();
        let mut ledger = Ledger::new(100_000.0);
        ledger
            .record(&port, date(2019, 12, 2), &buy("AAPL", 10))
            .unwrap();
        ledger
            .record(&port, date(2019, 12, 3), &buy("AMZN", 10))
            .unwrap();

        let snapshot = ledger.snapshot(&port, date(2019, 12, 4), true).unwrap();
        let cash = 100_000.0 - 2672.69989 - 17_600.0;
        assert_relative_eq!(snapshot.amount_invested, 100_000.0);
        assert_relative_eq!(snapshot.cash_in_hand, cash, max_relative = 1e-9);
        assert_relative_eq!(
            snapshot.current_valuation,
            cash + 10.0 * 261.070007 + 10.0 * 1774.010010,
            max_relative = 1e-9,
        );
        assert_relative_eq!(
            snapshot.total_profit,
            snapshot.current_valuation - 100_000.0,
            max_relative = 1e-9,
        );
        assert_eq!(
            snapshot.symbols_held,
            vec!["AAPL".to_string(), "AMZN".to_string()]
        );
    }

    #[test]
    fn snapshot_is_idempotent() {
        let port = december_port();
        let mut ledger = Ledger::new(100_000.0);
        ledger
            .record(&port, date(2019, 12, 2), &buy("AAPL", 10))
            .unwrap();

        let first = ledger.snapshot(&port, date(2019, 12, 4), true).unwrap();
        let second = ledger.snapshot(&port, date(2019, 12, 4), true).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn amount_invested_is_pinned_across_trades() {
        let port = december_port();
        let mut ledger = Ledger::new(100_000.0);
        ledger
            .record(&port, date(2019, 12, 2), &buy("AAPL", 10))
            .unwrap();
        ledger
            .record(&port, date(2019, 12, 9), &sell("AAPL", 10))
            .unwrap();

        let snapshot = ledger.snapshot(&port, date(2019, 12, 9), true).unwrap();
        assert_relative_eq!(snapshot.amount_invested, 100_000.0);
        assert!(snapshot.symbols_held.is_empty());
        // fully flat: valuation is just cash
        assert_relative_eq!(
            snapshot.current_valuation,
            snapshot.cash_in_hand,
            max_relative = 1e-9,
        );
    }

    #[test]
    fn non_strict_snapshot_survives_data_gap() {
        let port = december_port();
        let mut ledger = Ledger::new(100_000.0);
        ledger
            .record(&port, date(2019, 12, 2), &buy("AAPL", 10))
            .unwrap();

        // 12-07 is a Saturday with no data: strict fails, non-strict keeps
        // the mark from the buy.
        assert!(ledger.snapshot(&port, date(2019, 12, 7), true).is_err());
        let snapshot = ledger.snapshot(&port, date(2019, 12, 7), false).unwrap();
        assert_relative_eq!(
            snapshot.current_valuation,
            ledger.cash() + 2672.69989,
            max_relative = 1e-9,
        );
    }
}
