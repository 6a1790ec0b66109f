//! Period high / low over the last n bars.

use crate::domain::indicator::IndicatorType;
use crate::domain::ohlcv::{OhlcvBar, tail};

pub fn period_high(bars: &[OhlcvBar], period: usize) -> Option<f64> {
    if !IndicatorType::PeriodHigh(period).is_ready(bars.len()) {
        return None;
    }
    tail(bars, period)?
        .iter()
        .map(|b| b.high)
        .reduce(f64::max)
}

pub fn period_low(bars: &[OhlcvBar], period: usize) -> Option<f64> {
    if !IndicatorType::PeriodLow(period).is_ready(bars.len()) {
        return None;
    }
    tail(bars, period)?
        .iter()
        .map(|b| b.low)
        .reduce(f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::bars_from_closes;

    fn ranged_bars() -> Vec<crate::domain::ohlcv::OhlcvBar> {
        let mut bars = bars_from_closes(&[100.0; 4]);
        let ranges = [(120.0, 80.0), (105.0, 95.0), (103.0, 97.0), (104.0, 99.0)];
        for (bar, (high, low)) in bars.iter_mut().zip(ranges) {
            bar.high = high;
            bar.low = low;
        }
        bars
    }

    #[test]
    fn high_and_low_of_tail() {
        let bars = ranged_bars();
        assert_eq!(period_high(&bars, 3), Some(105.0));
        assert_eq!(period_low(&bars, 3), Some(95.0));
        assert_eq!(period_high(&bars, 4), Some(120.0));
        assert_eq!(period_low(&bars, 4), Some(80.0));
    }

    #[test]
    fn insufficient_bars() {
        let bars = ranged_bars();
        assert!(period_high(&bars, 5).is_none());
        assert!(period_low(&bars, 5).is_none());
    }
}
