//! Core domain types and logic.

pub mod ohlcv;
pub mod quote;
pub mod price_history;
pub mod indicator;
pub mod signal;
pub mod rule_eval;
pub mod suppression;
pub mod summary;
pub mod engine;
pub mod monitor;
pub mod config_validation;
pub mod error;
