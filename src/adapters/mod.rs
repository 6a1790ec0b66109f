//! Concrete adapter implementations for ports.

pub mod console_notifier;
pub mod csv_adapter;
pub mod csv_signal_log;
pub mod fanout;
pub mod file_config_adapter;
