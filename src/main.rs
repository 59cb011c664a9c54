//! Gesture Lock CLI
//!
//! Drives the lock from recorded accelerometer traces.

use anyhow::Context;
use clap::{Parser, Subcommand};
use gesture_lock::{
    acquisition::{ManualClock, SampleClock, SleepClock},
    audit::{create_shared_log_with_persistence, AuditLog},
    config::Config,
    core::SignatureSummary,
    sensor::{load_trace, spawn_feeder, Button, ChannelSensor, LogFeedback, DEFAULT_CHANNEL_CAPACITY},
    storage::{FileMedium, PersistentMedium, SignatureStore, StoreError},
    GestureLock, VERSION,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Exit code for a rejected unlock attempt.
const EXIT_REJECTED: i32 = 2;

#[derive(Parser)]
#[command(name = "gesture-lock")]
#[command(version = VERSION)]
#[command(about = "Record a motion gesture and unlock by repeating it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a new reference gesture from a trace (holds the record button)
    Record {
        /// Trace file with one `x,y,z` reading per line
        #[arg(long, short)]
        input: PathBuf,

        /// Sample at the configured interval instead of as fast as possible
        #[arg(long)]
        realtime: bool,
    },

    /// Attempt to unlock with a trace (holds the attempt button)
    Attempt {
        /// Trace file with one `x,y,z` reading per line
        #[arg(long, short)]
        input: PathBuf,

        /// Sample at the configured interval instead of as fast as possible
        #[arg(long)]
        realtime: bool,
    },

    /// Show the stored reference gesture
    Show,

    /// Erase the persistent medium and reset usage statistics
    Erase,

    /// Show usage statistics
    Status,

    /// Show configuration
    Config {
        /// Write the current configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Record { input, realtime } => cmd_record(&input, realtime),
        Commands::Attempt { input, realtime } => match cmd_attempt(&input, realtime) {
            Ok(true) => Ok(()),
            Ok(false) => std::process::exit(EXIT_REJECTED),
            Err(e) => Err(e),
        },
        Commands::Show => cmd_show(),
        Commands::Erase => cmd_erase(),
        Commands::Status => cmd_status(),
        Commands::Config { init } => cmd_config(init),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn load_config() -> anyhow::Result<Config> {
    let config = Config::load().context("Could not load configuration")?;
    config
        .ensure_directories()
        .context("Could not create data directory")?;
    Ok(config)
}

fn open_store(config: &Config) -> anyhow::Result<SignatureStore<FileMedium>> {
    let medium = FileMedium::open(config.medium_path(), config.medium_size)
        .with_context(|| format!("Could not open medium {:?}", config.medium_path()))?;
    SignatureStore::new(medium, config.base_addr).context("Invalid storage layout")
}

fn open_lock<C: SampleClock>(
    config: &Config,
    sensor: ChannelSensor,
    clock: C,
) -> anyhow::Result<GestureLock<ChannelSensor, LogFeedback, C, FileMedium>> {
    Ok(GestureLock::new(
        sensor,
        LogFeedback,
        clock,
        open_store(config)?,
        config.settings(),
    ))
}

/// Start feeding a trace into a sensor that holds `button` until the trace
/// runs out or Ctrl+C is pressed.
fn start_replay(
    input: &Path,
    button: Button,
) -> anyhow::Result<(ChannelSensor, std::thread::JoinHandle<usize>)> {
    let readings =
        load_trace(input).with_context(|| format!("Could not read trace {input:?}"))?;

    let running = Arc::new(AtomicBool::new(true));
    ctrlc_handler(running.clone())?;

    let (sender, sensor) = ChannelSensor::new(button, DEFAULT_CHANNEL_CAPACITY);
    let feeder = spawn_feeder(readings, sender, running);
    Ok((sensor, feeder))
}

fn cmd_record(input: &Path, realtime: bool) -> anyhow::Result<()> {
    let config = load_config()?;
    let audit = create_shared_log_with_persistence(config.audit_path());
    let (sensor, feeder) = start_replay(input, Button::Record)?;

    let result = if realtime {
        open_lock(&config, sensor, SleepClock)?
            .with_audit(audit.clone())
            .record()
    } else {
        open_lock(&config, sensor, ManualClock::new())?
            .with_audit(audit.clone())
            .record()
    };
    let _ = feeder.join();
    let outcome = result.context("Recording failed")?;

    println!(
        "Recorded gesture: {} samples ({} reads, {})",
        outcome.signature.len(),
        outcome.iterations,
        if outcome.smoothed {
            "smoothed"
        } else {
            "too short to smooth"
        }
    );
    if let Some(summary) = SignatureSummary::from_signature(&outcome.signature) {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    if let Err(e) = audit.save() {
        eprintln!("Warning: Could not save audit log: {e}");
    }
    Ok(())
}

fn cmd_attempt(input: &Path, realtime: bool) -> anyhow::Result<bool> {
    let config = load_config()?;
    let audit = create_shared_log_with_persistence(config.audit_path());
    let (sensor, feeder) = start_replay(input, Button::Attempt)?;

    let outcome = if realtime {
        open_lock(&config, sensor, SleepClock)?
            .with_audit(audit.clone())
            .attempt()
    } else {
        open_lock(&config, sensor, ManualClock::new())?
            .with_audit(audit.clone())
            .attempt()
    };
    let _ = feeder.join();

    match outcome.distance {
        Some(distance) => println!(
            "DTW distance: {distance:.3} (threshold {})",
            config.dtw_threshold
        ),
        None => println!("DTW distance: n/a"),
    }
    println!(
        "Attempt: {} samples, {} faulty samples dropped",
        outcome.attempt.len(),
        outcome.dropped
    );
    match outcome.verdict {
        gesture_lock::Verdict::Accept => println!("Unlocked ✓"),
        gesture_lock::Verdict::Reject(reason) => println!("Rejected ✗ ({reason})"),
    }

    if let Err(e) = audit.save() {
        eprintln!("Warning: Could not save audit log: {e}");
    }
    Ok(outcome.is_accept())
}

fn cmd_show() -> anyhow::Result<()> {
    let config = load_config()?;
    let store = open_store(&config)?;

    match store.load() {
        Ok(signature) => {
            let report = serde_json::json!({
                "base_addr": store.base_addr(),
                "values": signature,
                "summary": SignatureSummary::from_signature(&signature),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Err(StoreError::NoReference { .. }) => {
            println!("No reference gesture stored.");
            println!("Run 'gesture-lock record --input <trace>' to record one.");
            Ok(())
        }
        Err(e) => Err(e).context("Could not read reference"),
    }
}

fn cmd_erase() -> anyhow::Result<()> {
    let config = load_config()?;
    let mut store = open_store(&config)?;
    store
        .medium_mut()
        .erase()
        .context("Could not erase medium")?;
    println!("Medium erased. No reference gesture is stored.");

    let audit = AuditLog::with_persistence(config.audit_path());
    audit.reset();
    audit.save().context("Could not reset audit log")?;
    println!("Usage statistics reset.");
    Ok(())
}

fn cmd_status() -> anyhow::Result<()> {
    let config = load_config()?;

    println!("Gesture Lock Status");
    println!("===================");
    println!();

    let has_reference = open_store(&config)?
        .load()
        .map(|s| !s.is_empty())
        .unwrap_or(false);
    println!(
        "Reference gesture: {}",
        if has_reference {
            "stored ✓"
        } else {
            "none ✗"
        }
    );
    println!();

    println!("Configuration:");
    println!("  DTW threshold: {}", config.dtw_threshold);
    println!("  Minimum length: {}", config.min_length);
    println!("  Smoothing window: {}", config.window_size);
    println!(
        "  Sample interval: {}ms",
        config.sample_interval.as_millis()
    );
    println!();

    if config.audit_path().exists() {
        let stats = AuditLog::with_persistence(config.audit_path()).stats();
        println!("Cumulative Statistics:");
        println!("  Gestures recorded: {}", stats.recordings);
        println!("  Unlock attempts: {}", stats.attempts);
        println!("  Accepted: {}", stats.accepted);
        println!("  Rejected: {}", stats.rejected);
        println!("  Faulty samples dropped: {}", stats.samples_dropped);
    } else {
        println!("No previous session data found.");
    }
    Ok(())
}

fn cmd_config(init: bool) -> anyhow::Result<()> {
    let config = Config::load().context("Could not load configuration")?;

    if init {
        config.save().context("Could not write configuration")?;
        println!("Configuration written to {:?}", Config::config_path());
        return Ok(());
    }

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

/// Set up Ctrl+C handler.
fn ctrlc_handler(running: Arc<AtomicBool>) -> anyhow::Result<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .context("Error setting Ctrl+C handler")
}
