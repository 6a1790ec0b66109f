//! SMA (Simple Moving Average).
//!
//! SMA(n) = mean of the last n closes. Unavailable below n bars.

use crate::domain::indicator::IndicatorType;
use crate::domain::ohlcv::{OhlcvBar, closes, tail};

pub fn sma(bars: &[OhlcvBar], period: usize) -> Option<f64> {
    if !IndicatorType::Sma(period).is_ready(bars.len()) {
        return None;
    }
    let window = tail(bars, period)?;
    Some(closes(window).sum::<f64>() / period as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::bars_from_closes;
    use approx::assert_relative_eq;

    #[test]
    fn sma_of_last_closes() {
        let closes: Vec<f64> = (100..=120).map(f64::from).collect();
        let bars = bars_from_closes(&closes);
        assert_relative_eq!(sma(&bars, 20).unwrap(), 110.5);
    }

    #[test]
    fn sma_exact_length() {
        let bars = bars_from_closes(&[10.0, 11.0]);
        assert_relative_eq!(sma(&bars, 2).unwrap(), 10.5);
    }

    #[test]
    fn sma_insufficient_bars() {
        let bars = bars_from_closes(&[1.0, 2.0, 3.0]);
        assert!(sma(&bars, 4).is_none());
        assert!(sma(&[], 1).is_none());
    }

    #[test]
    fn sma_zero_period() {
        let bars = bars_from_closes(&[1.0, 2.0]);
        assert!(sma(&bars, 0).is_none());
    }
}
