//! Per-symbol price history.
//!
//! Each ingest is a full snapshot: the new series replaces the previous one
//! wholesale. Bars that only existed in the previous series are gone after
//! the replace, so the provider's refresh window must always cover the
//! lookback the rules need.

use crate::domain::error::SignalwatchError;
use crate::domain::ohlcv::OhlcvBar;
use std::collections::HashMap;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
pub struct PriceHistoryStore {
    series: HashMap<String, Vec<OhlcvBar>>,
}

impl PriceHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the series held for `symbol`.
    ///
    /// An empty series leaves the current one in place. A series whose
    /// timestamps are not strictly increasing is rejected and the store is
    /// left unchanged.
    pub fn ingest(&mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Result<(), SignalwatchError> {
        if bars.is_empty() {
            debug!(symbol, "ignoring empty history refresh");
            return Ok(());
        }
        validate_series(symbol, &bars)?;

        if let Some(previous) = self.series.get(symbol) {
            if let (Some(prev_last), Some(first)) = (previous.last(), bars.first()) {
                if first.timestamp > prev_last.timestamp {
                    warn!(
                        symbol,
                        previous_end = %prev_last.timestamp,
                        refreshed_start = %first.timestamp,
                        "refreshed window does not overlap previous history; bars dropped"
                    );
                }
            }
        }

        info!(symbol, bars = bars.len(), "updated price history");
        self.series.insert(symbol.to_string(), bars);
        Ok(())
    }

    pub fn get(&self, symbol: &str) -> Option<&[OhlcvBar]> {
        self.series.get(symbol).map(Vec::as_slice)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

fn validate_series(symbol: &str, bars: &[OhlcvBar]) -> Result<(), SignalwatchError> {
    for pair in bars.windows(2) {
        if pair[1].timestamp <= pair[0].timestamp {
            return Err(SignalwatchError::InvalidSeries {
                symbol: symbol.to_string(),
                reason: format!(
                    "timestamps not strictly increasing at {} -> {}",
                    pair[0].timestamp, pair[1].timestamp
                ),
            });
        }
    }
    Ok(())
}
