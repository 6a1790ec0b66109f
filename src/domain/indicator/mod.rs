//! Technical indicators over a price series.
//!
//! Every indicator reads only the tail of the series it needs and returns
//! `None` ("unavailable") when the series is shorter than the indicator's
//! minimum lookback, as reported by [`IndicatorType::min_bars`]. No
//! indicator ever fails; insufficient data is the normal warm-up path.

pub mod change;
pub mod range;
pub mod rsi;
pub mod sma;
pub mod volume;

pub use change::{PriceChange, price_change};
pub use range::{period_high, period_low};
pub use rsi::rsi;
pub use sma::sma;
pub use volume::volume_average;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Rsi(usize),
    VolumeAverage(usize),
    PeriodHigh(usize),
    PeriodLow(usize),
    PriceChange(usize),
}

impl IndicatorType {
    /// Minimum number of bars needed before the indicator yields a value.
    ///
    /// Indicators that take a difference (RSI, price change) need one bar
    /// more than their period.
    pub fn min_bars(&self) -> usize {
        match *self {
            IndicatorType::Sma(n)
            | IndicatorType::VolumeAverage(n)
            | IndicatorType::PeriodHigh(n)
            | IndicatorType::PeriodLow(n) => n,
            IndicatorType::Rsi(n) | IndicatorType::PriceChange(n) => n + 1,
        }
    }

    fn period(&self) -> usize {
        match *self {
            IndicatorType::Sma(n)
            | IndicatorType::Rsi(n)
            | IndicatorType::VolumeAverage(n)
            | IndicatorType::PeriodHigh(n)
            | IndicatorType::PeriodLow(n)
            | IndicatorType::PriceChange(n) => n,
        }
    }

    /// Whether `bars` bars satisfy the lookback. A zero period never does.
    pub fn is_ready(&self, bars: usize) -> bool {
        self.period() > 0 && bars >= self.min_bars()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::VolumeAverage(period) => write!(f, "VOLUME_AVG({})", period),
            IndicatorType::PeriodHigh(period) => write!(f, "HIGH({})", period),
            IndicatorType::PeriodLow(period) => write!(f, "LOW({})", period),
            IndicatorType::PriceChange(period) => write!(f, "CHANGE({})", period),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domain::ohlcv::OhlcvBar;
    use chrono::{Duration, NaiveDate};

    pub fn bars_from_closes(closes: &[f64]) -> Vec<OhlcvBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                symbol: "TEST".into(),
                timestamp: start + Duration::minutes(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000.0,
            })
            .collect()
    }
}
