//! OHLCV bar representation.

use chrono::NaiveDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub symbol: String,
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Closing prices of `bars`, oldest first.
pub fn closes(bars: &[OhlcvBar]) -> impl Iterator<Item = f64> + '_ {
    bars.iter().map(|b| b.close)
}

/// The last `n` bars of `bars`, or `None` if fewer than `n` exist.
pub fn tail(bars: &[OhlcvBar], n: usize) -> Option<&[OhlcvBar]> {
    if n == 0 || bars.len() < n {
        return None;
    }
    Some(&bars[bars.len() - n..])
}
