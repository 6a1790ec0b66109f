//! Price change over n periods.
//!
//! change = C[-1] - C[-1-n], change_pct = change / C[-1-n] * 100
//! Unavailable below n + 1 bars, or when the reference close is 0.

use crate::domain::indicator::IndicatorType;
use crate::domain::ohlcv::{OhlcvBar, tail};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceChange {
    pub change: f64,
    pub change_pct: f64,
}

pub fn price_change(bars: &[OhlcvBar], periods: usize) -> Option<PriceChange> {
    if !IndicatorType::PriceChange(periods).is_ready(bars.len()) {
        return None;
    }
    let window = tail(bars, periods + 1)?;
    let previous = window.first()?.close;
    let current = window.last()?.close;
    if previous == 0.0 {
        return None;
    }

    let change = current - previous;
    Some(PriceChange {
        change,
        change_pct: change / previous * 100.0,
    })
}
