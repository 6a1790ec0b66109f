#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use signalwatch::domain::error::SignalwatchError;
pub use signalwatch::domain::ohlcv::OhlcvBar;
use signalwatch::domain::quote::CurrentPrices;
use signalwatch::domain::signal::Signal;
use signalwatch::domain::summary::MarketSummary;
use signalwatch::ports::data_port::MarketDataPort;
use signalwatch::ports::notify_port::NotifyPort;
use std::cell::RefCell;
use std::collections::HashMap;

pub fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 3)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

pub fn at(secs: i64) -> NaiveDateTime {
    base_time() + Duration::seconds(secs)
}

pub fn make_bar(symbol: &str, index: usize, close: f64) -> OhlcvBar {
    OhlcvBar {
        symbol: symbol.to_string(),
        timestamp: base_time() - Duration::minutes(1000) + Duration::minutes(index as i64),
        open: close,
        high: close,
        low: close,
        close,
        volume: 1000.0,
    }
}

pub fn bars_from_closes(symbol: &str, closes: &[f64]) -> Vec<OhlcvBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_bar(symbol, i, c))
        .collect()
}

/// `n` bars closing at `close` with a +/- `half_range` high/low band.
pub fn banded_bars(symbol: &str, n: usize, close: f64, half_range: f64) -> Vec<OhlcvBar> {
    (0..n)
        .map(|i| {
            let mut bar = make_bar(symbol, i, close);
            bar.high = close + half_range;
            bar.low = close - half_range;
            bar
        })
        .collect()
}

pub fn prices(entries: &[(&str, f64)]) -> CurrentPrices {
    entries.iter().map(|&(s, p)| (s, p)).collect()
}

pub struct MockDataPort {
    pub history: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
    pub quotes: RefCell<CurrentPrices>,
    pub fail_quotes: bool,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            history: HashMap::new(),
            errors: HashMap::new(),
            quotes: RefCell::new(CurrentPrices::new()),
            fail_quotes: false,
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.history.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    pub fn with_quotes(self, quotes: CurrentPrices) -> Self {
        *self.quotes.borrow_mut() = quotes;
        self
    }

    pub fn set_quotes(&self, quotes: CurrentPrices) {
        *self.quotes.borrow_mut() = quotes;
    }
}

impl MarketDataPort for MockDataPort {
    fn fetch_history(&self, symbol: &str) -> Result<Vec<OhlcvBar>, SignalwatchError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(SignalwatchError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self.history.get(symbol).cloned().unwrap_or_default())
    }

    fn current_prices(&self, _symbols: &[String]) -> Result<CurrentPrices, SignalwatchError> {
        if self.fail_quotes {
            return Err(SignalwatchError::DataSource {
                reason: "quote feed down".into(),
            });
        }
        Ok(self.quotes.borrow().clone())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub signals: RefCell<Vec<Signal>>,
    pub summaries: RefCell<Vec<MarketSummary>>,
    pub statuses: RefCell<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NotifyPort for RecordingNotifier {
    fn send_signal(&self, signal: &Signal) -> Result<(), SignalwatchError> {
        self.signals.borrow_mut().push(signal.clone());
        Ok(())
    }

    fn send_summary(&self, summary: &MarketSummary) -> Result<(), SignalwatchError> {
        self.summaries.borrow_mut().push(summary.clone());
        Ok(())
    }

    fn send_status(&self, message: &str) -> Result<(), SignalwatchError> {
        self.statuses.borrow_mut().push(message.to_string());
        Ok(())
    }
}
