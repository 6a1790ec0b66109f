//! RSI (Relative Strength Index).
//!
//! Simple-average variant over the last n close-to-close deltas:
//! - avg_gain = mean of positive deltas (zeros for down moves)
//! - avg_loss = mean of |negative deltas| (zeros for up moves)
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0 and avg_gain > 0: RSI = 100
//! If both are 0 (flat window): unavailable
//!
//! Warmup: needs n + 1 bars.

use crate::domain::indicator::IndicatorType;
use crate::domain::ohlcv::{OhlcvBar, tail};

pub fn rsi(bars: &[OhlcvBar], period: usize) -> Option<f64> {
    if !IndicatorType::Rsi(period).is_ready(bars.len()) {
        return None;
    }
    let window = tail(bars, period + 1)?;

    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    for pair in window.windows(2) {
        let change = pair[1].close - pair[0].close;
        if change > 0.0 {
            gain_sum += change;
        } else if change < 0.0 {
            loss_sum -= change;
        }
    }

    let avg_gain = gain_sum / period as f64;
    let avg_loss = loss_sum / period as f64;

    if avg_loss == 0.0 {
        return if avg_gain > 0.0 { Some(100.0) } else { None };
    }
    Some(100.0 - (100.0 / (1.0 + avg_gain / avg_loss)))
}
