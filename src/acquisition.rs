//! Gesture acquisition.
//!
//! While the trigger holds, the loop samples the accelerometer at a fixed
//! cadence and appends normalized magnitudes to a signature. A steady
//! cadence matters: DTW tolerates speed differences in the gesture, not in
//! the sampling clock.

use crate::core::signature::Signature;
use crate::sensor::types::{Feedback, MotionSensor, Rgb, INDICATOR_COUNT};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default interval between samples.
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(30);

/// Paces the acquisition loop.
pub trait SampleClock {
    /// Block for `duration`.
    fn wait(&mut self, duration: Duration);
}

/// A clock that really sleeps.
#[derive(Debug, Default)]
pub struct SleepClock;

impl SampleClock for SleepClock {
    fn wait(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// A clock that only counts, for replay and tests.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ManualClock {
    pub waits: usize,
    pub elapsed: Duration,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SampleClock for ManualClock {
    fn wait(&mut self, duration: Duration) {
        self.waits += 1;
        self.elapsed += duration;
    }
}

/// Which phase is capturing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionMode {
    /// Recording a new reference; every sample is kept
    Record,
    /// Capturing an unlock attempt; NaN samples are dropped
    Attempt,
}

impl AcquisitionMode {
    /// Indicator colour shown while sampling.
    pub fn color(self) -> Rgb {
        match self {
            AcquisitionMode::Record => Rgb::YELLOW,
            AcquisitionMode::Attempt => Rgb::BLUE,
        }
    }
}

/// Sampling parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcquisitionSettings {
    pub normalize_factor: f32,
    pub sample_interval: Duration,
}

impl Default for AcquisitionSettings {
    fn default() -> Self {
        Self {
            normalize_factor: crate::sensor::types::NORMALIZE_FACTOR,
            sample_interval: SAMPLE_INTERVAL,
        }
    }
}

/// Result of one acquisition run.
#[derive(Debug, Clone, PartialEq)]
pub struct AcquisitionReport {
    /// Raw, unsmoothed signature
    pub signature: Signature,
    /// Loop iterations (sensor reads)
    pub iterations: usize,
    /// NaN samples dropped (attempt mode only)
    pub dropped: usize,
}

/// Capture a signature while `trigger` holds.
///
/// The trigger is polled once per iteration with the sensor, so a button on
/// the same board can gate the capture. Stops when the trigger releases or
/// the signature reaches capacity.
pub fn acquire<S, F, C, T>(
    mode: AcquisitionMode,
    settings: &AcquisitionSettings,
    sensor: &mut S,
    feedback: &mut F,
    clock: &mut C,
    mut trigger: T,
) -> AcquisitionReport
where
    S: MotionSensor,
    F: Feedback,
    C: SampleClock,
    T: FnMut(&mut S) -> bool,
{
    let mut signature = Signature::new();
    let mut iterations = 0;
    let mut dropped = 0;

    while !signature.is_full() && trigger(&mut *sensor) {
        flash_indicators(feedback, mode.color());

        let magnitude = sensor.read_motion().magnitude(settings.normalize_factor);
        iterations += 1;

        if mode == AcquisitionMode::Attempt && magnitude.is_nan() {
            dropped += 1;
            tracing::debug!(iteration = iterations, "Dropped NaN sample");
        } else if signature.push(magnitude).is_err() {
            break;
        }

        clock.wait(settings.sample_interval);
    }

    tracing::debug!(
        ?mode,
        len = signature.len(),
        iterations,
        dropped,
        "Acquisition finished"
    );

    AcquisitionReport {
        signature,
        iterations,
        dropped,
    }
}

/// Light every indicator, then clear them.
fn flash_indicators<F: Feedback>(feedback: &mut F, color: Rgb) {
    for i in 0..INDICATOR_COUNT {
        feedback.set_indicator(i, color);
    }
    feedback.clear_indicators();
}
