//! Append-only CSV log of dispatched signals.

use crate::domain::error::SignalwatchError;
use crate::domain::signal::Signal;
use crate::domain::summary::MarketSummary;
use crate::ports::notify_port::NotifyPort;
use std::cell::RefCell;
use std::fs::{File, OpenOptions};
use std::path::Path;

const HEADER: [&str; 7] = [
    "timestamp",
    "symbol",
    "kind",
    "strategy",
    "price",
    "confidence",
    "message",
];

pub struct CsvSignalLog {
    writer: RefCell<csv::Writer<File>>,
}

impl CsvSignalLog {
    /// Open `path` for appending, writing the header if the file is new or
    /// empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SignalwatchError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let is_empty = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if is_empty {
            writer.write_record(HEADER).map_err(notify_error)?;
            writer.flush()?;
        }
        Ok(Self {
            writer: RefCell::new(writer),
        })
    }
}

impl NotifyPort for CsvSignalLog {
    fn send_signal(&self, signal: &Signal) -> Result<(), SignalwatchError> {
        let mut writer = self.writer.borrow_mut();
        writer
            .write_record([
                signal.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                signal.symbol.clone(),
                signal.kind.to_string(),
                signal.strategy().to_string(),
                format!("{:.4}", signal.price),
                format!("{:.2}", signal.confidence()),
                signal.message.clone(),
            ])
            .map_err(notify_error)?;
        writer.flush()?;
        Ok(())
    }

    fn send_summary(&self, _summary: &MarketSummary) -> Result<(), SignalwatchError> {
        Ok(())
    }

    fn send_status(&self, _message: &str) -> Result<(), SignalwatchError> {
        Ok(())
    }
}

fn notify_error(e: csv::Error) -> SignalwatchError {
    SignalwatchError::Notify {
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::signal::{SignalKind, SignalMetadata};
    use chrono::NaiveDate;
    use std::fs;

    fn spike() -> Signal {
        Signal::new(
            "SPY",
            SignalKind::Alert,
            410.0,
            NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(9, 45, 0)
                .unwrap(),
            "SPY volume spike: 3.0x average volume".into(),
            6.0,
            SignalMetadata::VolumeSpike {
                current_volume: 3000.0,
                average_volume: 1000.0,
                volume_ratio: 3.0,
            },
        )
    }

    #[test]
    fn writes_header_once_and_appends() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("signals.csv");

        CsvSignalLog::open(&path).unwrap().send_signal(&spike()).unwrap();
        CsvSignalLog::open(&path).unwrap().send_signal(&spike()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "timestamp,symbol,kind,strategy,price,confidence,message");
        assert_eq!(
            lines[1],
            "2024-03-01 09:45:00,SPY,ALERT,Volume_Spike,410.0000,6.00,SPY volume spike: 3.0x average volume"
        );
    }
}
