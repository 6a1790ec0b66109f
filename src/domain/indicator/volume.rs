//! Rolling volume average.

use crate::domain::indicator::IndicatorType;
use crate::domain::ohlcv::{OhlcvBar, tail};

/// Mean volume over the last `period` bars, including the latest one.
pub fn volume_average(bars: &[OhlcvBar], period: usize) -> Option<f64> {
    if !IndicatorType::VolumeAverage(period).is_ready(bars.len()) {
        return None;
    }
    let window = tail(bars, period)?;
    Some(window.iter().map(|b| b.volume).sum::<f64>() / period as f64)
}
