//! CSV file market data adapter.
//!
//! Layout under the base directory:
//! - `<SYMBOL>.csv`: `timestamp,open,high,low,close,volume`, one bar per row
//! - `prices.csv` (optional): `symbol,price`, the live quotes for a cycle
//!
//! Without `prices.csv` the last close of each history file is used as the
//! current price. Files are re-read on every call so an external process can
//! keep them up to date between cycles.

use crate::domain::error::SignalwatchError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::quote::CurrentPrices;
use crate::ports::data_port::MarketDataPort;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

const PRICES_FILE: &str = "prices.csv";

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn read_quotes(&self) -> Result<Option<HashMap<String, f64>>, SignalwatchError> {
        let path = self.base_path.join(PRICES_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(|e| SignalwatchError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut quotes = HashMap::new();
        for result in rdr.records() {
            let record = result.map_err(|e| SignalwatchError::DataSource {
                reason: format!("CSV parse error in {}: {}", PRICES_FILE, e),
            })?;
            let symbol = field(&record, 0, "symbol")?.trim().to_uppercase();
            let price = parse_number(&record, 1, "price")?;
            quotes.insert(symbol, price);
        }
        Ok(Some(quotes))
    }
}

impl MarketDataPort for CsvAdapter {
    fn fetch_history(&self, symbol: &str) -> Result<Vec<OhlcvBar>, SignalwatchError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| SignalwatchError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| SignalwatchError::DataSource {
                reason: format!("CSV parse error: {}", e),
            })?;

            bars.push(OhlcvBar {
                symbol: symbol.to_string(),
                timestamp: parse_timestamp(field(&record, 0, "timestamp")?)?,
                open: parse_number(&record, 1, "open")?,
                high: parse_number(&record, 2, "high")?,
                low: parse_number(&record, 3, "low")?,
                close: parse_number(&record, 4, "close")?,
                volume: parse_number(&record, 5, "volume")?,
            });
        }

        bars.sort_by_key(|b| b.timestamp);
        debug!(symbol, bars = bars.len(), path = %path.display(), "read history");
        Ok(bars)
    }

    fn current_prices(&self, symbols: &[String]) -> Result<CurrentPrices, SignalwatchError> {
        let mut prices = CurrentPrices::new();

        if let Some(quotes) = self.read_quotes()? {
            for symbol in symbols {
                match quotes.get(symbol) {
                    Some(&price) => prices.insert(symbol.as_str(), price),
                    None => debug!(symbol = %symbol, "no quote in {}", PRICES_FILE),
                }
            }
            return Ok(prices);
        }

        for symbol in symbols {
            if !self.csv_path(symbol).exists() {
                debug!(symbol = %symbol, "no history file; no current price");
                continue;
            }
            if let Some(last) = self.fetch_history(symbol)?.last() {
                prices.insert(symbol.as_str(), last.close);
            }
        }
        Ok(prices)
    }
}

fn field<'r>(
    record: &'r csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<&'r str, SignalwatchError> {
    record.get(index).ok_or_else(|| SignalwatchError::DataSource {
        reason: format!("missing {} column", name),
    })
}

fn parse_number(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<f64, SignalwatchError> {
    field(record, index, name)?
        .trim()
        .parse()
        .map_err(|e| SignalwatchError::DataSource {
            reason: format!("invalid {} value: {}", name, e),
        })
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, SignalwatchError> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(|d| d.and_time(NaiveTime::MIN))
        })
        .map_err(|e| SignalwatchError::DataSource {
            reason: format!("invalid timestamp {:?}: {}", raw, e),
        })
}
