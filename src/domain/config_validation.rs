//! Monitor configuration: parsing and validation.
//!
//! Validates all config fields before the first cycle runs.

use crate::domain::error::SignalwatchError;
use crate::ports::config_port::ConfigPort;
use std::collections::HashSet;

pub const DEFAULT_MA_PERIOD: i64 = 20;
pub const DEFAULT_RSI_PERIOD: i64 = 14;
pub const DEFAULT_CYCLE_INTERVAL_SECS: i64 = 60;
pub const DEFAULT_SUMMARY_INTERVAL_SECS: i64 = 1800;
/// Upper bound for `cycle_interval` and `summary_interval`: one week.
pub const MAX_INTERVAL_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    pub symbols: Vec<String>,
    pub ma_period: usize,
    pub rsi_period: usize,
    pub data_path: Option<String>,
    pub cycle_interval_secs: u64,
    pub summary_interval_secs: u64,
    pub refresh_history: bool,
    /// 0 means run until stopped.
    pub max_cycles: u64,
    pub signal_log: Option<String>,
    pub log_level: String,
}

impl MonitorConfig {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, SignalwatchError> {
        let symbols = parse_symbols(config.get_string("trading", "symbols").as_deref())?;
        let ma_period = positive_int(config, "trading", "ma_period", DEFAULT_MA_PERIOD)?;
        let rsi_period = positive_int(config, "trading", "rsi_period", DEFAULT_RSI_PERIOD)?;
        let cycle_interval_secs = at_most(
            "bot",
            "cycle_interval",
            positive_int(config, "bot", "cycle_interval", DEFAULT_CYCLE_INTERVAL_SECS)?,
            MAX_INTERVAL_SECS,
        )?;
        let summary_interval_secs = at_most(
            "bot",
            "summary_interval",
            non_negative_int(
                config,
                "bot",
                "summary_interval",
                DEFAULT_SUMMARY_INTERVAL_SECS,
            )?,
            MAX_INTERVAL_SECS,
        )?;
        let max_cycles = non_negative_int(config, "bot", "max_cycles", 0)?;

        Ok(Self {
            symbols,
            ma_period: ma_period as usize,
            rsi_period: rsi_period as usize,
            data_path: non_empty(config.get_string("data", "path")),
            cycle_interval_secs,
            summary_interval_secs,
            refresh_history: config.get_bool("bot", "refresh_history", true),
            max_cycles,
            signal_log: non_empty(config.get_string("notify", "signal_log")),
            log_level: non_empty(config.get_string("logging", "level"))
                .unwrap_or_else(|| "info".to_string()),
        })
    }
}

/// Parse a comma-separated symbol list. Symbols are upper-cased; empty
/// tokens and duplicates are rejected.
pub fn parse_symbols(input: Option<&str>) -> Result<Vec<String>, SignalwatchError> {
    let input = match input {
        Some(s) if !s.trim().is_empty() => s,
        _ => {
            return Err(SignalwatchError::ConfigMissing {
                section: "trading".to_string(),
                key: "symbols".to_string(),
            });
        }
    };

    let mut symbols = Vec::new();
    let mut seen = HashSet::new();
    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(invalid("trading", "symbols", "empty token in symbol list"));
        }
        let symbol = trimmed.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(invalid(
                "trading",
                "symbols",
                &format!("duplicate symbol: {symbol}"),
            ));
        }
        symbols.push(symbol);
    }
    Ok(symbols)
}

fn positive_int(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<u64, SignalwatchError> {
    let value = checked_int(config, section, key, default)?;
    if value < 1 {
        return Err(invalid(section, key, &format!("{key} must be at least 1")));
    }
    Ok(value as u64)
}

fn non_negative_int(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<u64, SignalwatchError> {
    let value = checked_int(config, section, key, default)?;
    if value < 0 {
        return Err(invalid(section, key, &format!("{key} must be non-negative")));
    }
    Ok(value as u64)
}

fn at_most(section: &str, key: &str, value: u64, max: u64) -> Result<u64, SignalwatchError> {
    if value > max {
        return Err(invalid(section, key, &format!("{key} must be at most {max}")));
    }
    Ok(value)
}

/// `ConfigPort::get_int` falls back to the default on garbage; a present
/// but non-numeric value is reported instead of silently defaulted.
fn checked_int(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<i64, SignalwatchError> {
    match config.get_string(section, key) {
        Some(raw) if raw.trim().parse::<i64>().is_err() => Err(invalid(
            section,
            key,
            &format!("{key} must be an integer, got {raw:?}"),
        )),
        _ => Ok(config.get_int(section, key, default)),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn invalid(section: &str, key: &str, reason: &str) -> SignalwatchError {
    SignalwatchError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn defaults_applied() {
        let config = make_config("[trading]\nsymbols = aapl, msft\n");
        let parsed = MonitorConfig::from_config(&config).unwrap();
        assert_eq!(parsed.symbols, vec!["AAPL", "MSFT"]);
        assert_eq!(parsed.ma_period, 20);
        assert_eq!(parsed.rsi_period, 14);
        assert_eq!(parsed.cycle_interval_secs, 60);
        assert_eq!(parsed.summary_interval_secs, 1800);
        assert!(parsed.refresh_history);
        assert_eq!(parsed.max_cycles, 0);
        assert_eq!(parsed.data_path, None);
        assert_eq!(parsed.signal_log, None);
        assert_eq!(parsed.log_level, "info");
    }

    #[test]
    fn full_config() {
        let config = make_config(
            r#"
[trading]
symbols = SPY,QQQ
ma_period = 50
rsi_period = 10

[data]
path = /var/data

[bot]
cycle_interval = 30
summary_interval = 0
refresh_history = false
max_cycles = 3

[notify]
signal_log = signals.csv

[logging]
level = debug
"#,
        );
        let parsed = MonitorConfig::from_config(&config).unwrap();
        assert_eq!(parsed.ma_period, 50);
        assert_eq!(parsed.rsi_period, 10);
        assert_eq!(parsed.data_path.as_deref(), Some("/var/data"));
        assert_eq!(parsed.cycle_interval_secs, 30);
        assert_eq!(parsed.summary_interval_secs, 0);
        assert!(!parsed.refresh_history);
        assert_eq!(parsed.max_cycles, 3);
        assert_eq!(parsed.signal_log.as_deref(), Some("signals.csv"));
        assert_eq!(parsed.log_level, "debug");
    }

    #[test]
    fn missing_symbols() {
        let config = make_config("[trading]\nma_period = 20\n");
        let err = MonitorConfig::from_config(&config).unwrap_err();
        assert!(matches!(
            err,
            SignalwatchError::ConfigMissing { ref key, .. } if key == "symbols"
        ));
    }

    #[test]
    fn zero_ma_period_rejected() {
        let config = make_config("[trading]\nsymbols = AAPL\nma_period = 0\n");
        let err = MonitorConfig::from_config(&config).unwrap_err();
        assert!(matches!(
            err,
            SignalwatchError::ConfigInvalid { ref key, .. } if key == "ma_period"
        ));
    }

    #[test]
    fn non_numeric_interval_rejected() {
        let config = make_config("[trading]\nsymbols = AAPL\n[bot]\ncycle_interval = soon\n");
        let err = MonitorConfig::from_config(&config).unwrap_err();
        assert!(matches!(
            err,
            SignalwatchError::ConfigInvalid { ref key, .. } if key == "cycle_interval"
        ));
    }

    #[test]
    fn oversized_intervals_rejected() {
        let config = make_config(
            "[trading]\nsymbols = AAPL\n[bot]\nsummary_interval = 10000000000000000\n",
        );
        let err = MonitorConfig::from_config(&config).unwrap_err();
        assert!(matches!(
            err,
            SignalwatchError::ConfigInvalid { ref key, .. } if key == "summary_interval"
        ));

        let config = make_config("[trading]\nsymbols = AAPL\n[bot]\ncycle_interval = 604801\n");
        assert!(MonitorConfig::from_config(&config).is_err());

        let config = make_config("[trading]\nsymbols = AAPL\n[bot]\nsummary_interval = 604800\n");
        assert_eq!(
            MonitorConfig::from_config(&config).unwrap().summary_interval_secs,
            MAX_INTERVAL_SECS
        );
    }

    #[test]
    fn negative_max_cycles_rejected() {
        let config = make_config("[trading]\nsymbols = AAPL\n[bot]\nmax_cycles = -1\n");
        assert!(MonitorConfig::from_config(&config).is_err());
    }

    #[test]
    fn parse_symbols_rejects_duplicates_and_blanks() {
        assert!(matches!(
            parse_symbols(Some("AAPL,aapl")),
            Err(SignalwatchError::ConfigInvalid { .. })
        ));
        assert!(matches!(
            parse_symbols(Some("AAPL,,MSFT")),
            Err(SignalwatchError::ConfigInvalid { .. })
        ));
        assert!(matches!(
            parse_symbols(Some("   ")),
            Err(SignalwatchError::ConfigMissing { .. })
        ));
        assert_eq!(
            parse_symbols(Some(" spy , qqq ")).unwrap(),
            vec!["SPY", "QQQ"]
        );
    }
}
