//! Cycle driver over the data and notification ports.
//!
//! Wraps a [`SignalEngine`] with the surrounding lifecycle: initial history
//! load, per-cycle refresh and price fetch, dispatch of surviving signals,
//! the market-summary cadence, and running statistics.

use crate::domain::config_validation::MonitorConfig;
use crate::domain::engine::SignalEngine;
use crate::domain::error::SignalwatchError;
use crate::ports::data_port::MarketDataPort;
use crate::ports::notify_port::NotifyPort;
use chrono::{Duration, NaiveDateTime};
use std::fmt;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    pub cycles: u64,
    pub data_updates: u64,
    pub candidate_signals: u64,
    pub signals_sent: u64,
    pub suppressed: u64,
    pub errors: u64,
}

impl fmt::Display for CycleStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cycles={} data_updates={} signals={} sent={} suppressed={} errors={}",
            self.cycles,
            self.data_updates,
            self.candidate_signals,
            self.signals_sent,
            self.suppressed,
            self.errors
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The provider returned no prices; nothing was evaluated.
    NoPrices,
    Evaluated {
        sent: usize,
        suppressed: usize,
        faults: usize,
        summary_sent: bool,
    },
}

pub struct Monitor<'a> {
    config: MonitorConfig,
    data: &'a dyn MarketDataPort,
    notifier: &'a dyn NotifyPort,
    engine: SignalEngine,
    stats: CycleStats,
    started_at: Option<NaiveDateTime>,
    last_summary: Option<NaiveDateTime>,
    last_update: Option<NaiveDateTime>,
}

impl<'a> Monitor<'a> {
    pub fn new(
        config: MonitorConfig,
        data: &'a dyn MarketDataPort,
        notifier: &'a dyn NotifyPort,
    ) -> Self {
        let engine = SignalEngine::new(config.ma_period, config.rsi_period);
        Self {
            config,
            data,
            notifier,
            engine,
            stats: CycleStats::default(),
            started_at: None,
            last_summary: None,
            last_update: None,
        }
    }

    pub fn engine(&self) -> &SignalEngine {
        &self.engine
    }

    pub fn stats(&self) -> CycleStats {
        self.stats
    }

    pub fn last_update(&self) -> Option<NaiveDateTime> {
        self.last_update
    }

    /// Load history for every symbol and announce startup.
    pub fn start(&mut self, now: NaiveDateTime) -> Result<usize, SignalwatchError> {
        info!(symbols = self.config.symbols.len(), "starting monitor");
        self.started_at = Some(now);
        let loaded = self.load_history()?;

        let message = format!(
            "signalwatch started at {}; monitoring {} (MA{} crossover, volume spike, breakout)",
            now.format("%Y-%m-%d %H:%M:%S"),
            self.config.symbols.join(", "),
            self.config.ma_period
        );
        if let Err(e) = self.notifier.send_status(&message) {
            warn!(error = %e, "failed to send startup message");
        }
        Ok(loaded)
    }

    /// Fetch and ingest history for each configured symbol. Failures are
    /// per symbol; only a load where every symbol fails is an error.
    pub fn load_history(&mut self) -> Result<usize, SignalwatchError> {
        let mut loaded = 0;
        for symbol in &self.config.symbols {
            let result = self
                .data
                .fetch_history(symbol)
                .and_then(|bars| {
                    if bars.is_empty() {
                        return Err(SignalwatchError::NoData {
                            symbol: symbol.clone(),
                        });
                    }
                    self.engine.ingest(symbol, bars)
                });
            match result {
                Ok(()) => loaded += 1,
                Err(e) => {
                    self.stats.errors += 1;
                    warn!(symbol = %symbol, error = %e, "failed to load history");
                }
            }
        }

        if loaded == 0 {
            return Err(SignalwatchError::NoData {
                symbol: self.config.symbols.join(","),
            });
        }
        info!(loaded, total = self.config.symbols.len(), "history loaded");
        Ok(loaded)
    }

    pub fn run_cycle(&mut self, now: NaiveDateTime) -> Result<CycleOutcome, SignalwatchError> {
        self.stats.cycles += 1;
        debug!(cycle = self.stats.cycles, "starting cycle");

        if self.config.refresh_history && self.stats.cycles > 1 {
            if let Err(e) = self.load_history() {
                warn!(error = %e, "history refresh failed; evaluating stale history");
            }
        }

        let prices = match self.data.current_prices(&self.config.symbols) {
            Ok(p) => p,
            Err(e) => {
                self.stats.errors += 1;
                error!(error = %e, "failed to fetch current prices");
                return Err(e);
            }
        };
        if prices.is_empty() {
            warn!("no current prices received");
            return Ok(CycleOutcome::NoPrices);
        }
        self.stats.data_updates += 1;
        self.last_update = Some(now);

        let report = self.engine.run_cycle(&prices, now);
        self.stats.candidate_signals += report.candidates() as u64;
        self.stats.suppressed += report.suppressed.len() as u64;
        self.stats.errors += report.faults.len() as u64;

        let mut sent = 0;
        for signal in &report.emitted {
            match self.notifier.send_signal(signal) {
                Ok(()) => sent += 1,
                Err(e) => {
                    self.stats.errors += 1;
                    error!(symbol = %signal.symbol, error = %e, "failed to dispatch signal");
                }
            }
        }
        self.stats.signals_sent += sent as u64;
        if sent > 0 {
            info!(sent, candidates = report.candidates(), "signals dispatched");
        }

        let mut summary_sent = false;
        if self.summary_due(now) {
            let summary = self.engine.market_summary(&prices, now);
            match self.notifier.send_summary(&summary) {
                Ok(()) => {
                    self.last_summary = Some(now);
                    summary_sent = true;
                    info!(symbols = summary.symbols.len(), "market summary sent");
                }
                Err(e) => {
                    self.stats.errors += 1;
                    warn!(error = %e, "failed to send market summary");
                }
            }
        }

        Ok(CycleOutcome::Evaluated {
            sent,
            suppressed: report.suppressed.len(),
            faults: report.faults.len(),
            summary_sent,
        })
    }

    /// Announce shutdown with final statistics.
    pub fn stop(&mut self, now: NaiveDateTime) {
        let uptime = self
            .started_at
            .map(|start| format_uptime(now - start))
            .unwrap_or_else(|| "not started".to_string());
        info!(uptime = %uptime, stats = %self.stats, "stopping monitor");

        let message = format!(
            "signalwatch stopped at {} after {}; {}",
            now.format("%Y-%m-%d %H:%M:%S"),
            uptime,
            self.stats
        );
        if let Err(e) = self.notifier.send_status(&message) {
            warn!(error = %e, "failed to send shutdown message");
        }
    }

    fn summary_due(&self, now: NaiveDateTime) -> bool {
        let Some(last) = self.last_summary else {
            return true;
        };
        // An interval too large for a TimeDelta never comes due.
        i64::try_from(self.config.summary_interval_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .is_some_and(|interval| now - last >= interval)
    }
}

/// `"{h}h {m}m {s}s"`, dropping leading zero units.
pub fn format_uptime(uptime: Duration) -> String {
    let total = uptime.num_seconds().max(0);
    let (hours, rem) = (total / 3600, total % 3600);
    let (minutes, seconds) = (rem / 60, rem % 60);
    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}
