//! CLI definition and dispatch.

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::adapters::console_notifier::ConsoleNotifier;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_signal_log::CsvSignalLog;
use crate::adapters::fanout::Fanout;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::MonitorConfig;
use crate::domain::engine::SignalEngine;
use crate::domain::error::SignalwatchError;
use crate::domain::monitor::Monitor;
use crate::ports::data_port::MarketDataPort;
use crate::ports::notify_port::NotifyPort;

/// Consecutive failed cycles after which the loop backs off to twice the
/// cycle interval.
const MAX_CONSECUTIVE_FAILURES: u32 = 5;

/// How often an interruptible sleep re-checks the shutdown flag.
const SHUTDOWN_POLL: Duration = Duration::from_millis(250);

#[derive(Parser, Debug)]
#[command(name = "signalwatch", about = "Technical-analysis signal monitor")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the monitoring loop
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Run a single cycle and exit
        #[arg(long)]
        once: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print a market summary for the configured symbols
    Summary {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Run { config, once } => run_monitor(&config, once),
        Command::Validate { config } => run_validate(&config),
        Command::Summary { config } => run_summary(&config),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "signalwatch failed");
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<MonitorConfig, SignalwatchError> {
    let adapter = FileConfigAdapter::from_file(path)?;
    MonitorConfig::from_config(&adapter)
}

pub fn data_adapter(config: &MonitorConfig) -> Result<CsvAdapter, SignalwatchError> {
    match &config.data_path {
        Some(path) => Ok(CsvAdapter::new(PathBuf::from(path))),
        None => Err(SignalwatchError::ConfigMissing {
            section: "data".to_string(),
            key: "path".to_string(),
        }),
    }
}

/// Console output, plus the CSV signal log when one is configured.
pub fn build_notifier(config: &MonitorConfig) -> Result<Fanout, SignalwatchError> {
    let mut fanout = Fanout::new().with(Box::new(ConsoleNotifier::stdout()));
    if let Some(path) = &config.signal_log {
        fanout = fanout.with(Box::new(CsvSignalLog::open(path)?));
    }
    Ok(fanout)
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

fn run_monitor(config_path: &Path, once: bool) -> Result<(), SignalwatchError> {
    let config = load_config(config_path)?;
    init_tracing(&config.log_level);
    info!(config = %config_path.display(), "configuration loaded");

    let data = data_adapter(&config)?;
    let notifier = build_notifier(&config)?;
    let mut monitor = Monitor::new(config.clone(), &data, &notifier);
    monitor.start(now())?;

    let result = if once {
        info!("running single test cycle");
        monitor.run_cycle(now()).map(|_| ())
    } else {
        let shutdown = Arc::new(AtomicBool::new(false));
        if let Err(e) = install_shutdown_handler(Arc::clone(&shutdown)) {
            warn!(error = %e, "could not install signal handler; stop with max_cycles");
        }
        run_cycles(&mut monitor, &config, &shutdown, now, |d| {
            sleep_unless_shutdown(d, &shutdown)
        });
        Ok(())
    };

    monitor.stop(now());
    result
}

/// Set `shutdown` on SIGINT or SIGTERM.
///
/// The signals are awaited on a dedicated thread with its own
/// current-thread runtime, so the blocking loop only has to poll the flag.
pub fn install_shutdown_handler(shutdown: Arc<AtomicBool>) -> Result<(), SignalwatchError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    std::thread::Builder::new()
        .name("shutdown-signal".to_string())
        .spawn(move || {
            runtime.block_on(shutdown_signal());
            info!("shutdown signal received, stopping after the current cycle");
            shutdown.store(true, Ordering::SeqCst);
        })?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Sleep for `duration`, returning early once `shutdown` is set.
pub fn sleep_unless_shutdown(duration: Duration, shutdown: &AtomicBool) {
    let deadline = Instant::now() + duration;
    while !shutdown.load(Ordering::SeqCst) {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        std::thread::sleep(remaining.min(SHUTDOWN_POLL));
    }
}

/// Drive cycles at a fixed cadence until `max_cycles` is reached (forever
/// when 0) or `shutdown` is set. A failed cycle is logged and the loop
/// continues.
pub fn run_cycles(
    monitor: &mut Monitor<'_>,
    config: &MonitorConfig,
    shutdown: &AtomicBool,
    mut clock: impl FnMut() -> NaiveDateTime,
    mut sleep: impl FnMut(Duration),
) {
    let interval = Duration::from_secs(config.cycle_interval_secs);
    let mut consecutive_failures = 0u32;
    let mut completed = 0u64;
    info!(interval_secs = config.cycle_interval_secs, "starting main loop");

    while !shutdown.load(Ordering::SeqCst) {
        let started = Instant::now();
        match monitor.run_cycle(clock()) {
            Ok(_) => consecutive_failures = 0,
            Err(e) => {
                consecutive_failures += 1;
                warn!(error = %e, consecutive_failures, "cycle failed");
            }
        }

        completed += 1;
        if config.max_cycles > 0 && completed >= config.max_cycles {
            break;
        }
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        if consecutive_failures > MAX_CONSECUTIVE_FAILURES {
            warn!("repeated cycle failures; extending sleep");
            sleep(interval.saturating_mul(2));
            continue;
        }

        let elapsed = started.elapsed();
        match interval.checked_sub(elapsed) {
            Some(remaining) if !remaining.is_zero() => sleep(remaining),
            _ => warn!(
                elapsed_secs = elapsed.as_secs_f64(),
                "cycle took longer than the configured interval"
            ),
        }
    }
}

fn run_validate(config_path: &Path) -> Result<(), SignalwatchError> {
    let config = load_config(config_path)?;
    println!(
        "configuration OK: {} symbols ({}), MA{}, RSI{}, cycle every {}s",
        config.symbols.len(),
        config.symbols.join(","),
        config.ma_period,
        config.rsi_period,
        config.cycle_interval_secs
    );
    Ok(())
}

fn run_summary(config_path: &Path) -> Result<(), SignalwatchError> {
    let config = load_config(config_path)?;
    init_tracing(&config.log_level);
    let data = data_adapter(&config)?;

    let mut engine = SignalEngine::new(config.ma_period, config.rsi_period);
    for symbol in &config.symbols {
        match data.fetch_history(symbol) {
            Ok(bars) => engine.ingest(symbol, bars)?,
            Err(e) => warn!(symbol = %symbol, error = %e, "no history"),
        }
    }
    let prices = data.current_prices(&config.symbols)?;
    let summary = engine.market_summary(&prices, now());
    ConsoleNotifier::stdout().send_summary(&summary)
}
