//! Signalbox intersection controller
//!
//! Runs the signal cycle for one four-way intersection against an in-memory
//! board. Detector presses are simulated by typing `ns` or `ew` on stdin.
//!
//! # Example
//!
//! ```bash
//! # Fixed-time cycling only
//! signalbox --mode schedule
//!
//! # Cycling plus vehicle-actuated overrides, with a custom config and debug logs
//! signalbox --config intersection.json -v
//! ```

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use signalbox::config::{ControllerConfig, ControllerSettings};
use signalbox::controller::{Controller, ControllerBuilder};
use signalbox::driver::{MemoryPins, PinDriver, SignalDriver};
use signalbox::sensor::{run_override_handler, LineSensor};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::BufReader;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Which activities the controller runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Fixed cycle only; arrivals are not read
    Schedule,
    /// Arrivals only. The cycle must still run to apply phases, so this runs as `both`.
    Sensor,
    /// Fixed cycle with vehicle-actuated overrides
    Both,
}

/// Signalbox intersection controller
///
/// Cycles a four-way intersection through its six signal phases and lets
/// detected vehicles advance the cycle early. Stops on Ctrl+C or SIGTERM
/// with every light switched off.
#[derive(Parser, Debug)]
#[command(name = "signalbox")]
#[command(version, about, long_about = None)]
struct Args {
    /// Which activities to run
    #[arg(short, long, value_enum, default_value_t = Mode::Both)]
    mode: Mode,

    /// JSON configuration file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = match args.verbose {
        0 => "signalbox=info",
        1 => "signalbox=debug",
        _ => "signalbox=trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let result = runtime.block_on(run(args));

    // A pending stdin read parks a blocking thread until the next line; don't wait for it.
    runtime.shutdown_timeout(Duration::from_millis(100));

    result
}

async fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => ControllerConfig::load(path)?,
        None => ControllerConfig::default(),
    };
    let settings = config.validated().context("Configuration rejected")?;

    info!(
        green_ms = settings.timings.green.as_millis() as u64,
        yellow_ms = settings.timings.yellow.as_millis() as u64,
        red_ms = settings.timings.red.as_millis() as u64,
        initial = %settings.initial_phase,
        "Configuration loaded"
    );

    let driver = PinDriver::new(settings.pins.clone(), MemoryPins::new());
    let controller = ControllerBuilder::new(driver).settings(&settings).build();

    let overrides = match args.mode {
        Mode::Schedule => false,
        Mode::Both => true,
        Mode::Sensor => {
            warn!("Sensor mode cannot apply phases without the scheduler; running both");
            true
        }
    };
    if overrides {
        spawn_arrival_pipeline(&controller, &settings);
    }

    tokio::spawn(shutdown_on_signal(controller.clone()));

    info!(mode = ?args.mode, "Intersection controller started, press Ctrl+C to stop");
    controller
        .run_cycle()
        .await
        .context("Signal cycle failed")?;

    Ok(())
}

/// stdin → debounced events → override handler.
fn spawn_arrival_pipeline<D: SignalDriver + 'static>(
    controller: &Controller<D>,
    settings: &ControllerSettings,
) {
    let (tx, rx) = mpsc::channel(settings.event_queue_depth);
    let sensor = LineSensor::new(BufReader::new(tokio::io::stdin()), settings.debounce);
    let cancel = controller.cancellation_token();

    tokio::spawn(async move {
        if let Err(err) = sensor.run(tx, cancel).await {
            warn!(error = %err, "Sensor input failed; overrides disabled");
        }
    });
    tokio::spawn(run_override_handler(
        controller.clone(),
        rx,
        settings.indicator_pulse,
    ));

    info!("Type ns or ew and press Enter to simulate a vehicle arrival");
}

async fn shutdown_on_signal<D: SignalDriver + 'static>(controller: Controller<D>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let cancel = controller.cancellation_token();
    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
        _ = cancel.cancelled() => return,
    }

    controller.shutdown();
}
