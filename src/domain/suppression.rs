//! Duplicate-signal suppression.
//!
//! A signal is keyed by (symbol, strategy, kind). Once a key passes, further
//! signals with the same key are withheld until the recorded emission is at
//! least [`SUPPRESSION_WINDOW_SECS`] older than the incoming signal. Expired
//! keys are purged before every lookup.

use crate::domain::signal::{Signal, SignalKind, StrategyTag};
use chrono::{Duration, NaiveDateTime};
use std::collections::HashMap;
use tracing::info;

pub const SUPPRESSION_WINDOW_SECS: i64 = 300;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SuppressionKey {
    pub symbol: String,
    pub strategy: StrategyTag,
    pub kind: SignalKind,
}

impl SuppressionKey {
    pub fn of(signal: &Signal) -> Self {
        Self {
            symbol: signal.symbol.clone(),
            strategy: signal.strategy(),
            kind: signal.kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Suppressed,
}

#[derive(Debug)]
pub struct SignalSuppressor {
    window: Duration,
    last_emitted: HashMap<SuppressionKey, NaiveDateTime>,
}

impl Default for SignalSuppressor {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalSuppressor {
    pub fn new() -> Self {
        Self {
            window: Duration::seconds(SUPPRESSION_WINDOW_SECS),
            last_emitted: HashMap::new(),
        }
    }

    pub fn filter(&mut self, signal: &Signal) -> Verdict {
        let now = signal.timestamp;
        let window = self.window;
        self.last_emitted.retain(|_, emitted| now - *emitted < window);

        let key = SuppressionKey::of(signal);
        if self.last_emitted.contains_key(&key) {
            info!(
                symbol = %key.symbol,
                strategy = %key.strategy,
                kind = %key.kind,
                "skipping duplicate signal"
            );
            return Verdict::Suppressed;
        }
        self.last_emitted.insert(key, now);
        Verdict::Pass
    }

    /// Number of keys currently inside the window.
    pub fn active_keys(&self) -> usize {
        self.last_emitted.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::signal::{BreakoutDirection, CrossoverType, SignalMetadata};
    use chrono::NaiveDate;

    fn at(secs: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
            + Duration::seconds(secs)
    }

    fn crossover(symbol: &str, kind: SignalKind, secs: i64) -> Signal {
        Signal::new(
            symbol,
            kind,
            100.0,
            at(secs),
            "cross".into(),
            1.0,
            SignalMetadata::MaCrossover {
                ma_value: 99.0,
                ma_period: 20,
                crossover: CrossoverType::Bullish,
            },
        )
    }

    #[test]
    fn repeat_within_window_is_suppressed() {
        let mut suppressor = SignalSuppressor::new();
        assert_eq!(suppressor.filter(&crossover("AAPL", SignalKind::Buy, 0)), Verdict::Pass);
        assert_eq!(
            suppressor.filter(&crossover("AAPL", SignalKind::Buy, 120)),
            Verdict::Suppressed
        );
        assert_eq!(suppressor.filter(&crossover("AAPL", SignalKind::Buy, 301)), Verdict::Pass);
    }

    #[test]
    fn suppressed_signal_does_not_extend_window() {
        let mut suppressor = SignalSuppressor::new();
        suppressor.filter(&crossover("AAPL", SignalKind::Buy, 0));
        suppressor.filter(&crossover("AAPL", SignalKind::Buy, 299));
        assert_eq!(suppressor.filter(&crossover("AAPL", SignalKind::Buy, 300)), Verdict::Pass);
    }

    #[test]
    fn keys_differ_by_symbol_kind_and_strategy() {
        let mut suppressor = SignalSuppressor::new();
        assert_eq!(suppressor.filter(&crossover("AAPL", SignalKind::Buy, 0)), Verdict::Pass);
        assert_eq!(suppressor.filter(&crossover("MSFT", SignalKind::Buy, 0)), Verdict::Pass);
        assert_eq!(suppressor.filter(&crossover("AAPL", SignalKind::Sell, 0)), Verdict::Pass);

        let breakout = Signal::new(
            "AAPL",
            SignalKind::Buy,
            100.0,
            at(1),
            "break".into(),
            5.0,
            SignalMetadata::Breakout {
                level: 99.0,
                direction: BreakoutDirection::Upward,
            },
        );
        assert_eq!(suppressor.filter(&breakout), Verdict::Pass);
        assert_eq!(suppressor.active_keys(), 4);
    }

    #[test]
    fn expired_keys_are_purged() {
        let mut suppressor = SignalSuppressor::new();
        suppressor.filter(&crossover("AAPL", SignalKind::Buy, 0));
        suppressor.filter(&crossover("MSFT", SignalKind::Buy, 10));
        suppressor.filter(&crossover("GOOG", SignalKind::Buy, 400));
        assert_eq!(suppressor.active_keys(), 1);
    }
}
