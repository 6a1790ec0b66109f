//! Point-in-time market summary across all symbols.

use crate::domain::indicator::{PriceChange, price_change, rsi, sma};
use crate::domain::price_history::PriceHistoryStore;
use crate::domain::quote::CurrentPrices;
use chrono::NaiveDateTime;
use std::fmt;

pub const SUMMARY_CHANGE_PERIODS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    AboveMa,
    BelowMa,
    NoData,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Trend::AboveMa => "ABOVE_MA",
            Trend::BelowMa => "BELOW_MA",
            Trend::NoData => "NO_DATA",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolSummary {
    pub symbol: String,
    pub current_price: f64,
    pub moving_average: Option<f64>,
    pub rsi: Option<f64>,
    pub price_change: Option<PriceChange>,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketSummary {
    pub timestamp: NaiveDateTime,
    pub symbols: Vec<SymbolSummary>,
}

#[derive(Debug, Clone)]
pub struct MarketSummaryBuilder {
    ma_period: usize,
    rsi_period: usize,
}

impl MarketSummaryBuilder {
    pub fn new(ma_period: usize, rsi_period: usize) -> Self {
        Self {
            ma_period,
            rsi_period,
        }
    }

    /// One entry per symbol in `prices`, in the same order. Symbols without
    /// history get `NO_DATA` and empty indicators.
    pub fn build(
        &self,
        store: &PriceHistoryStore,
        prices: &CurrentPrices,
        timestamp: NaiveDateTime,
    ) -> MarketSummary {
        let symbols = prices
            .iter()
            .map(|(symbol, price)| {
                let bars = store.get(symbol).unwrap_or(&[]);
                let moving_average = sma(bars, self.ma_period);
                SymbolSummary {
                    symbol: symbol.to_string(),
                    current_price: price,
                    moving_average,
                    rsi: rsi(bars, self.rsi_period),
                    price_change: price_change(bars, SUMMARY_CHANGE_PERIODS),
                    trend: classify(price, moving_average),
                }
            })
            .collect();

        MarketSummary { timestamp, symbols }
    }
}

fn classify(price: f64, moving_average: Option<f64>) -> Trend {
    match moving_average {
        Some(ma) if price > ma => Trend::AboveMa,
        Some(_) => Trend::BelowMa,
        None => Trend::NoData,
    }
}
