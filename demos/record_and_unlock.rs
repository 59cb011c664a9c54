//! Demonstration of the gesture lock pipeline.
//!
//! This example shows how to:
//! 1. Feed a synthetic accelerometer trace through a channel-backed sensor
//! 2. Record it as the reference gesture
//! 3. Unlock with a close repeat of the gesture
//! 4. Get rejected with a different gesture
//!
//! Run with: cargo run --example record_and_unlock
//!
//! Set RUST_LOG=debug to see the captured values and indicator updates.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use gesture_lock::{
    acquisition::ManualClock,
    audit::create_shared_log,
    config::LockSettings,
    core::SignatureSummary,
    sensor::{spawn_feeder, Button, ChannelSensor, LogFeedback, MotionVector},
    storage::{MemoryMedium, SignatureStore, DEFAULT_BASE_ADDR},
    GestureLock, Verdict,
};

/// A wrist flick: rest, a sharp swing, then settle.
fn flick(scale: f32) -> Vec<MotionVector> {
    let profile = [
        1.0, 1.0, 1.1, 1.4, 2.0, 2.6, 3.0, 2.6, 2.0, 1.4, 1.1, 1.0, 1.0, 0.9, 1.0, 1.0,
    ];
    profile
        .iter()
        .map(|m| MotionVector::new(0.0, 0.0, m * scale * 10.0))
        .collect()
}

/// A slow shake: two shallow bumps.
fn shake() -> Vec<MotionVector> {
    (0..24)
        .map(|i| {
            let m = 1.0 + 0.8 * ((i as f32) * 0.5).sin().abs() * 4.0;
            MotionVector::new(m * 10.0, 0.0, 0.0)
        })
        .collect()
}

/// Replay `readings` while `button` is held.
fn sensor_for(button: Button, readings: Vec<MotionVector>) -> ChannelSensor {
    let (sender, sensor) = ChannelSensor::new(button, 4);
    spawn_feeder(readings, sender, Arc::new(AtomicBool::new(true)));
    sensor
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    println!("Gesture Lock - Record and Unlock Demo");
    println!("=====================================");
    println!();

    let store = match SignatureStore::new(MemoryMedium::default(), DEFAULT_BASE_ADDR) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error creating store: {e}");
            return;
        }
    };
    let audit = create_shared_log();

    let mut lock = GestureLock::new(
        sensor_for(Button::Record, flick(1.0)),
        LogFeedback,
        ManualClock::new(),
        store,
        LockSettings::default(),
    )
    .with_audit(audit.clone());

    println!("Recording reference gesture (wrist flick)...");
    match lock.record() {
        Ok(outcome) => {
            println!("  Stored {} samples", outcome.signature.len());
            if let Some(summary) = SignatureSummary::from_signature(&outcome.signature) {
                println!(
                    "  Range {:.2}..{:.2}, mean {:.2}",
                    summary.min, summary.max, summary.mean
                );
            }
        }
        Err(e) => {
            eprintln!("Error recording gesture: {e}");
            return;
        }
    }
    println!();

    let attempts = [
        ("same flick", flick(1.0)),
        ("slightly stronger flick", flick(1.1)),
        ("slow shake", shake()),
    ];

    for (name, readings) in attempts {
        *lock.sensor_mut() = sensor_for(Button::Attempt, readings);
        let outcome = lock.attempt();

        let distance = outcome
            .distance
            .map(|d| format!("{d:.3}"))
            .unwrap_or_else(|| "n/a".to_string());
        match outcome.verdict {
            Verdict::Accept => println!("  {name}: distance {distance} -> unlocked ✓"),
            Verdict::Reject(reason) => {
                println!("  {name}: distance {distance} -> rejected ✗ ({reason})")
            }
        }
    }

    println!();
    println!("{}", audit.summary());
}
