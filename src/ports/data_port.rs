//! Market data provider port.

use crate::domain::error::SignalwatchError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::quote::CurrentPrices;

pub trait MarketDataPort {
    /// Recent bars for `symbol`, oldest first. The result is a full snapshot
    /// and must cover every lookback the rules use.
    fn fetch_history(&self, symbol: &str) -> Result<Vec<OhlcvBar>, SignalwatchError>;

    /// Current price for each of `symbols` the provider can quote. Symbols
    /// without a quote are left out.
    fn current_prices(&self, symbols: &[String]) -> Result<CurrentPrices, SignalwatchError>;
}
