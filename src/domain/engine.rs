//! Signal engine: one long-lived owner of all per-cycle state.
//!
//! A cycle is ingest (done beforehand through [`SignalEngine::ingest`]),
//! evaluate, suppress. Summaries are built on demand and never pass the
//! suppressor. The engine is single-writer; callers must finish one cycle
//! before starting the next.

use crate::domain::error::SignalwatchError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::price_history::PriceHistoryStore;
use crate::domain::quote::CurrentPrices;
use crate::domain::rule_eval::{RuleEvaluator, SymbolFault};
use crate::domain::signal::Signal;
use crate::domain::summary::{MarketSummary, MarketSummaryBuilder};
use crate::domain::suppression::{SignalSuppressor, Verdict};
use chrono::NaiveDateTime;
use tracing::debug;

/// Outcome of one evaluation cycle.
#[derive(Debug, Default)]
pub struct CycleReport {
    /// Signals that passed suppression, in evaluation order.
    pub emitted: Vec<Signal>,
    pub suppressed: Vec<Signal>,
    pub faults: Vec<SymbolFault>,
}

impl CycleReport {
    pub fn candidates(&self) -> usize {
        self.emitted.len() + self.suppressed.len()
    }
}

#[derive(Debug)]
pub struct SignalEngine {
    store: PriceHistoryStore,
    evaluator: RuleEvaluator,
    suppressor: SignalSuppressor,
    summary: MarketSummaryBuilder,
}

impl SignalEngine {
    pub fn new(ma_period: usize, rsi_period: usize) -> Self {
        Self {
            store: PriceHistoryStore::new(),
            evaluator: RuleEvaluator::new(ma_period),
            suppressor: SignalSuppressor::new(),
            summary: MarketSummaryBuilder::new(ma_period, rsi_period),
        }
    }

    pub fn ingest(&mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Result<(), SignalwatchError> {
        self.store.ingest(symbol, bars)
    }

    pub fn store(&self) -> &PriceHistoryStore {
        &self.store
    }

    pub fn evaluator(&self) -> &RuleEvaluator {
        &self.evaluator
    }

    pub fn run_cycle(&mut self, prices: &CurrentPrices, now: NaiveDateTime) -> CycleReport {
        let evaluation = self.evaluator.evaluate_all(&self.store, prices, now);

        let mut report = CycleReport {
            faults: evaluation.faults,
            ..CycleReport::default()
        };
        for signal in evaluation.signals {
            match self.suppressor.filter(&signal) {
                Verdict::Pass => report.emitted.push(signal),
                Verdict::Suppressed => report.suppressed.push(signal),
            }
        }

        debug!(
            symbols = prices.len(),
            emitted = report.emitted.len(),
            suppressed = report.suppressed.len(),
            faults = report.faults.len(),
            "cycle evaluated"
        );
        report
    }

    pub fn market_summary(&self, prices: &CurrentPrices, now: NaiveDateTime) -> MarketSummary {
        self.summary.build(&self.store, prices, now)
    }
}
