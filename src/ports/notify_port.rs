//! Notification dispatch port.

use crate::domain::error::SignalwatchError;
use crate::domain::signal::Signal;
use crate::domain::summary::MarketSummary;

pub trait NotifyPort {
    fn send_signal(&self, signal: &Signal) -> Result<(), SignalwatchError>;

    fn send_summary(&self, summary: &MarketSummary) -> Result<(), SignalwatchError>;

    /// Free-form lifecycle message (startup, shutdown, statistics).
    fn send_status(&self, message: &str) -> Result<(), SignalwatchError>;
}
