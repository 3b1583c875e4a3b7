//! The universe: the validated pool of symbols a strategy may trade.

use chrono::NaiveDate;

use super::error::PapertradeError;
use crate::ports::price_port::PricePort;

pub const MIN_PROBE_BARS: usize = 4;

/// Probe window used to decide whether a symbol has usable history: it must
/// have at least [`MIN_PROBE_BARS`] bars over this week of known liquid
/// trading.
pub fn probe_window() -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(2019, 12, 2).expect("valid probe start"),
        NaiveDate::from_ymd_opt(2019, 12, 6).expect("valid probe end"),
    )
}

/// Insertion-ordered, duplicate-free set of admitted symbols.
#[derive(Debug, Clone, Default)]
pub struct Universe {
    symbols: Vec<String>,
}

impl Universe {
    pub fn new() -> Self {
        Universe::default()
    }

    /// Build a universe from symbols validated elsewhere (deduplicated,
    /// insertion order kept).
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut universe = Universe::new();
        for symbol in symbols {
            let symbol = symbol.into().to_uppercase();
            if !universe.symbols.contains(&symbol) {
                universe.symbols.push(symbol);
            }
        }
        universe
    }

    /// Admit a symbol after probing the price source for minimum history.
    /// Re-adding an already-admitted symbol is a no-op.
    pub fn add(&mut self, prices: &dyn PricePort, symbol: &str) -> Result<(), PapertradeError> {
        let symbol = symbol.to_uppercase();
        if self.symbols.contains(&symbol) {
            return Ok(());
        }

        let (probe_start, probe_end) = probe_window();
        let bars = prices
            .fetch_ohlc(&symbol, probe_start, probe_end)
            .map_err(|err| PapertradeError::InvalidSymbol {
                symbol: symbol.clone(),
                reason: err.to_string(),
            })?;
        if bars.len() < MIN_PROBE_BARS {
            return Err(PapertradeError::InvalidSymbol {
                symbol,
                reason: format!(
                    "only {} bars in probe window, minimum {} required",
                    bars.len(),
                    MIN_PROBE_BARS
                ),
            });
        }

        self.symbols.push(symbol);
        Ok(())
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    pub fn count(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Parse a comma-separated symbol list from configuration. Symbols are
/// upper-cased; empty tokens and duplicates are rejected.
pub fn parse_symbols(input: &str) -> Result<Vec<String>, PapertradeError> {
    let mut symbols: Vec<String> = Vec::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(PapertradeError::InvalidSymbol {
                symbol: input.to_string(),
                reason: "empty token in symbol list".to_string(),
            });
        }
        let symbol = trimmed.to_uppercase();
        if symbols.contains(&symbol) {
            return Err(PapertradeError::InvalidSymbol {
                symbol,
                reason: "duplicate symbol".to_string(),
            });
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}
