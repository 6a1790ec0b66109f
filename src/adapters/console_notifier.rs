//! Plain-text notifier writing one line per event.

use crate::domain::error::SignalwatchError;
use crate::domain::signal::Signal;
use crate::domain::summary::{MarketSummary, SymbolSummary};
use crate::ports::notify_port::NotifyPort;
use std::cell::RefCell;
use std::io::Write;

pub struct ConsoleNotifier<W: Write> {
    out: RefCell<W>,
}

impl ConsoleNotifier<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsoleNotifier<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn write_line(&self, line: &str) -> Result<(), SignalwatchError> {
        let mut out = self.out.borrow_mut();
        writeln!(out, "{line}")
            .and_then(|_| out.flush())
            .map_err(|e| SignalwatchError::Notify {
                reason: e.to_string(),
            })
    }
}

impl<W: Write> NotifyPort for ConsoleNotifier<W> {
    fn send_signal(&self, signal: &Signal) -> Result<(), SignalwatchError> {
        self.write_line(&format!(
            "[{}] {}",
            signal.timestamp.format("%H:%M:%S"),
            signal
        ))
    }

    fn send_summary(&self, summary: &MarketSummary) -> Result<(), SignalwatchError> {
        self.write_line(&format!(
            "Market summary {}",
            summary.timestamp.format("%Y-%m-%d %H:%M:%S")
        ))?;
        for entry in &summary.symbols {
            self.write_line(&format!("  {}", summary_line(entry)))?;
        }
        Ok(())
    }

    fn send_status(&self, message: &str) -> Result<(), SignalwatchError> {
        self.write_line(message)
    }
}

fn summary_line(entry: &SymbolSummary) -> String {
    let mut line = format!("{}: ${:.2} {}", entry.symbol, entry.current_price, entry.trend);
    if let Some(ma) = entry.moving_average {
        line.push_str(&format!(" | MA ${ma:.2}"));
    }
    if let Some(rsi) = entry.rsi {
        let zone = if rsi > 70.0 {
            "overbought"
        } else if rsi < 30.0 {
            "oversold"
        } else {
            "neutral"
        };
        line.push_str(&format!(" | RSI {rsi:.1} ({zone})"));
    }
    if let Some(pc) = entry.price_change {
        line.push_str(&format!(" | 5p {:+.2} ({:+.2}%)", pc.change, pc.change_pct));
    }
    line
}
