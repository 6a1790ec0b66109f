//! Rule evaluation engine.
//!
//! Three independent checks run per symbol, always in this order:
//!
//! 1. MA crossover: previous close vs current price around SMA(ma_period)
//! 2. Volume spike: latest bar volume above 2x the 20-bar average
//! 3. Breakout: current price outside the 20-bar high/low range
//!
//! Each check yields at most one signal. Symbols are visited in the order of
//! the [`CurrentPrices`] snapshot, so the output order is symbol-major, rule
//! minor. A fault on one symbol is reported and does not stop the others.

use crate::domain::error::SignalwatchError;
use crate::domain::indicator::{period_high, period_low, sma, volume_average};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::price_history::PriceHistoryStore;
use crate::domain::quote::CurrentPrices;
use crate::domain::signal::{
    BreakoutDirection, CrossoverType, MAX_CONFIDENCE, Signal, SignalKind, SignalMetadata,
};
use chrono::NaiveDateTime;
use std::collections::VecDeque;
use tracing::{debug, info, warn};

pub const VOLUME_LOOKBACK: usize = 20;
pub const VOLUME_SPIKE_MULTIPLIER: f64 = 2.0;
pub const BREAKOUT_LOOKBACK: usize = 20;
pub const BREAKOUT_CONFIDENCE: f64 = 5.0;
pub const SIGNAL_HISTORY_CAPACITY: usize = 100;

/// A symbol whose evaluation failed during a pass.
#[derive(Debug)]
pub struct SymbolFault {
    pub symbol: String,
    pub error: SignalwatchError,
}

#[derive(Debug, Default)]
pub struct Evaluation {
    pub signals: Vec<Signal>,
    pub faults: Vec<SymbolFault>,
}

#[derive(Debug)]
pub struct RuleEvaluator {
    ma_period: usize,
    history: VecDeque<Signal>,
}

impl RuleEvaluator {
    pub fn new(ma_period: usize) -> Self {
        Self {
            ma_period,
            history: VecDeque::with_capacity(SIGNAL_HISTORY_CAPACITY),
        }
    }

    pub fn ma_period(&self) -> usize {
        self.ma_period
    }

    pub fn check_ma_crossover(
        &self,
        symbol: &str,
        bars: &[OhlcvBar],
        current_price: f64,
        now: NaiveDateTime,
    ) -> Option<Signal> {
        let ma = sma(bars, self.ma_period)?;
        if bars.len() < 2 {
            return None;
        }
        let previous = bars[bars.len() - 2].close;

        let (kind, crossover, distance, message) = if previous <= ma && current_price > ma {
            (
                SignalKind::Buy,
                CrossoverType::Bullish,
                current_price - ma,
                format!(
                    "{symbol} crossed above MA{}: ${current_price:.2} > ${ma:.2}",
                    self.ma_period
                ),
            )
        } else if previous >= ma && current_price < ma {
            (
                SignalKind::Sell,
                CrossoverType::Bearish,
                ma - current_price,
                format!(
                    "{symbol} crossed below MA{}: ${current_price:.2} < ${ma:.2}",
                    self.ma_period
                ),
            )
        } else {
            return None;
        };

        let confidence = (distance / ma * 100.0).min(MAX_CONFIDENCE);
        Some(Signal::new(
            symbol,
            kind,
            current_price,
            now,
            message,
            confidence,
            SignalMetadata::MaCrossover {
                ma_value: ma,
                ma_period: self.ma_period,
                crossover,
            },
        ))
    }

    /// Compares the latest bar's volume with the 20-bar average (which
    /// includes that bar). The signal is priced at the latest close.
    pub fn check_volume_spike(
        &self,
        symbol: &str,
        bars: &[OhlcvBar],
        now: NaiveDateTime,
    ) -> Option<Signal> {
        let average = volume_average(bars, VOLUME_LOOKBACK)?;
        let latest = bars.last()?;
        if average <= 0.0 || latest.volume <= average * VOLUME_SPIKE_MULTIPLIER {
            return None;
        }

        let ratio = latest.volume / average;
        Some(Signal::new(
            symbol,
            SignalKind::Alert,
            latest.close,
            now,
            format!("{symbol} volume spike: {ratio:.1}x average volume"),
            (ratio * 2.0).min(MAX_CONFIDENCE),
            SignalMetadata::VolumeSpike {
                current_volume: latest.volume,
                average_volume: average,
                volume_ratio: ratio,
            },
        ))
    }

    pub fn check_breakout(
        &self,
        symbol: &str,
        bars: &[OhlcvBar],
        current_price: f64,
        now: NaiveDateTime,
    ) -> Option<Signal> {
        let high = period_high(bars, BREAKOUT_LOOKBACK)?;
        let low = period_low(bars, BREAKOUT_LOOKBACK)?;

        let (kind, level, direction, message) = if current_price > high {
            (
                SignalKind::Buy,
                high,
                BreakoutDirection::Upward,
                format!("{symbol} breakout above resistance: ${current_price:.2} > ${high:.2}"),
            )
        } else if current_price < low {
            (
                SignalKind::Sell,
                low,
                BreakoutDirection::Downward,
                format!("{symbol} breakdown below support: ${current_price:.2} < ${low:.2}"),
            )
        } else {
            return None;
        };

        Some(Signal::new(
            symbol,
            kind,
            current_price,
            now,
            message,
            BREAKOUT_CONFIDENCE,
            SignalMetadata::Breakout { level, direction },
        ))
    }

    /// Run all three checks for one symbol.
    ///
    /// A symbol with no stored history yields no signals. A non-finite or
    /// non-positive current price is a fault.
    pub fn evaluate_symbol(
        &self,
        store: &PriceHistoryStore,
        symbol: &str,
        current_price: f64,
        now: NaiveDateTime,
    ) -> Result<Vec<Signal>, SignalwatchError> {
        if !current_price.is_finite() || current_price <= 0.0 {
            return Err(SignalwatchError::InvalidPrice {
                symbol: symbol.to_string(),
                price: current_price,
            });
        }
        let Some(bars) = store.get(symbol) else {
            debug!(symbol, "no price history; skipping rules");
            return Ok(Vec::new());
        };
        debug!(symbol, price = current_price, bars = bars.len(), "evaluating rules");

        let signals = [
            self.check_ma_crossover(symbol, bars, current_price, now),
            self.check_volume_spike(symbol, bars, now),
            self.check_breakout(symbol, bars, current_price, now),
        ]
        .into_iter()
        .flatten()
        .collect();
        Ok(signals)
    }

    /// Evaluate every symbol in `prices` and record the emitted signals in
    /// the bounded history.
    pub fn evaluate_all(
        &mut self,
        store: &PriceHistoryStore,
        prices: &CurrentPrices,
        now: NaiveDateTime,
    ) -> Evaluation {
        let mut evaluation = Evaluation::default();

        for (symbol, price) in prices.iter() {
            match self.evaluate_symbol(store, symbol, price, now) {
                Ok(signals) => {
                    for signal in &signals {
                        info!(
                            symbol,
                            kind = %signal.kind,
                            strategy = %signal.strategy(),
                            confidence = signal.confidence(),
                            "{}",
                            signal.message
                        );
                    }
                    evaluation.signals.extend(signals);
                }
                Err(error) => {
                    warn!(symbol, %error, "rule evaluation failed; continuing with next symbol");
                    evaluation.faults.push(SymbolFault {
                        symbol: symbol.to_string(),
                        error,
                    });
                }
            }
        }

        self.record(&evaluation.signals);
        evaluation
    }

    /// Most recent emitted candidates, oldest first.
    pub fn history(&self) -> impl ExactSizeIterator<Item = &Signal> {
        self.history.iter()
    }

    fn record(&mut self, signals: &[Signal]) {
        for signal in signals {
            if self.history.len() == SIGNAL_HISTORY_CAPACITY {
                self.history.pop_front();
            }
            self.history.push_back(signal.clone());
        }
    }
}
