//! Domain error types.

/// Top-level error type for signalwatch.
#[derive(Debug, thiserror::Error)]
pub enum SignalwatchError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("invalid price series for {symbol}: {reason}")]
    InvalidSeries { symbol: String, reason: String },

    #[error("invalid current price for {symbol}: {price}")]
    InvalidPrice { symbol: String, price: f64 },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("notification error: {reason}")]
    Notify { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SignalwatchError> for std::process::ExitCode {
    fn from(err: &SignalwatchError) -> Self {
        let code: u8 = match err {
            SignalwatchError::Io(_) => 1,
            SignalwatchError::ConfigParse { .. }
            | SignalwatchError::ConfigMissing { .. }
            | SignalwatchError::ConfigInvalid { .. } => 2,
            SignalwatchError::DataSource { .. } => 3,
            SignalwatchError::NoData { .. }
            | SignalwatchError::InvalidSeries { .. }
            | SignalwatchError::InvalidPrice { .. } => 5,
            SignalwatchError::Notify { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
