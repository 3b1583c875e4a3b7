//! CSV file price adapter: one `{SYMBOL}.csv` per symbol in a base
//! directory, columns `date,open,high,low,close,volume`. This is the
//! offline cache backing; a live feed plugs in behind the same port.

use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

use crate::domain::error::PapertradeError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::price_port::PricePort;

pub struct CsvPriceAdapter {
    base_path: PathBuf,
}

impl CsvPriceAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol.to_uppercase()))
    }

    /// First and last available dates plus bar count for a symbol.
    pub fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, PapertradeError> {
        let bars = self.fetch_ohlc(symbol, NaiveDate::MIN, NaiveDate::MAX)?;
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, bars.len())),
            _ => None,
        })
    }
}

impl PricePort for CsvPriceAdapter {
    fn fetch_ohlc(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, PapertradeError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| PapertradeError::PriceSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| PapertradeError::PriceSource {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| PapertradeError::PriceSource {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                PapertradeError::PriceSource {
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            if date < start || date > end {
                continue;
            }

            let open = parse_field(&record, 1, "open")?;
            let high = parse_field(&record, 2, "high")?;
            let low = parse_field(&record, 3, "low")?;
            let close = parse_field(&record, 4, "close")?;

            let volume: i64 = record
                .get(5)
                .ok_or_else(|| PapertradeError::PriceSource {
                    reason: "missing volume column".into(),
                })?
                .parse()
                .map_err(|e| PapertradeError::PriceSource {
                    reason: format!("invalid volume value: {}", e),
                })?;

            bars.push(OhlcvBar {
                symbol: symbol.to_uppercase(),
                date,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

fn parse_field(
    record: &csv::StringRecord,
    idx: usize,
    name: &str,
) -> Result<f64, PapertradeError> {
    record
        .get(idx)
        .ok_or_else(|| PapertradeError::PriceSource {
            reason: format!("missing {name} column"),
        })?
        .parse()
        .map_err(|e| PapertradeError::PriceSource {
            reason: format!("invalid {name} value: {}", e),
        })
}
