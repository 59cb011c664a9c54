//! The gesture lock: record a reference gesture, then unlock by repeating it.
//!
//! Recording and unlocking share one capture path (acquire, then smooth).
//! A recording is written to the store as the new reference. An attempt is
//! compared against the stored reference with DTW and the decision policy
//! renders the verdict. Nothing here is fatal: a missing or corrupt
//! reference simply rejects.

use crate::acquisition::{acquire, AcquisitionMode, SampleClock};
use crate::audit::SharedAuditLog;
use crate::config::LockSettings;
use crate::core::decision::{RejectReason, Verdict};
use crate::core::dtw::dtw_distance;
use crate::core::signature::Signature;
use crate::core::smoothing::smooth;
use crate::sensor::types::{Button, ButtonSource, Feedback, MotionSensor, Rgb, INDICATOR_COUNT};
use crate::storage::{PersistentMedium, SignatureStore, StoreError};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Tone marking the start of a capture.
const START_TONE_HZ: u32 = 440;
/// Tone marking the end of a capture.
const END_TONE_HZ: u32 = 880;
/// Tone played on unlock.
const ACCEPT_TONE_HZ: u32 = 1320;
/// Tone played twice on reject.
const REJECT_TONE_HZ: u32 = 100;
const TONE_MS: u32 = 100;
/// Delay between lighting successive indicators on unlock.
const RESULT_STEP: Duration = Duration::from_millis(200);

/// Result of a recording.
#[derive(Debug, Clone, Serialize)]
pub struct RecordOutcome {
    /// The stored reference, after smoothing
    pub signature: Signature,
    /// Whether smoothing was applied
    pub smoothed: bool,
    /// Sensor reads taken
    pub iterations: usize,
}

/// Result of an unlock attempt.
#[derive(Debug, Clone, Serialize)]
pub struct UnlockOutcome {
    pub verdict: Verdict,
    /// DTW distance, if a reference was available to compare against
    pub distance: Option<f32>,
    /// The smoothed attempt signature
    pub attempt: Signature,
    /// NaN samples dropped during capture
    pub dropped: usize,
}

impl UnlockOutcome {
    pub fn is_accept(&self) -> bool {
        self.verdict.is_accept()
    }
}

/// What one pass of the main loop did.
#[derive(Debug)]
pub enum LockEvent {
    Recorded(Result<RecordOutcome, LockError>),
    Attempted(UnlockOutcome),
}

/// A gesture lock over a sensor board, feedback outputs, a clock and a store.
pub struct GestureLock<S, F, C, M> {
    sensor: S,
    feedback: F,
    clock: C,
    store: SignatureStore<M>,
    settings: LockSettings,
    audit: Option<SharedAuditLog>,
}

impl<S, F, C, M> GestureLock<S, F, C, M>
where
    S: MotionSensor + ButtonSource,
    F: Feedback,
    C: SampleClock,
    M: PersistentMedium,
{
    pub fn new(
        sensor: S,
        feedback: F,
        clock: C,
        store: SignatureStore<M>,
        settings: LockSettings,
    ) -> Self {
        Self {
            sensor,
            feedback,
            clock,
            store,
            settings,
            audit: None,
        }
    }

    /// Count every outcome in `audit`.
    pub fn with_audit(mut self, audit: SharedAuditLog) -> Self {
        self.audit = Some(audit);
        self
    }

    /// One pass of the device loop.
    ///
    /// A press is acted on only if the button is still held after the
    /// debounce delay. The record button is checked first; the attempt
    /// button is only checked when record is not pressed at all.
    pub fn poll(&mut self) -> Option<LockEvent> {
        if self.sensor.is_pressed(Button::Record) {
            self.clock.wait(self.settings.debounce);
            if self.sensor.is_pressed(Button::Record) {
                tracing::info!("Record button pressed, recording gesture");
                return Some(LockEvent::Recorded(self.record()));
            }
        } else if self.sensor.is_pressed(Button::Attempt) {
            self.clock.wait(self.settings.debounce);
            if self.sensor.is_pressed(Button::Attempt) {
                tracing::info!("Attempt button pressed, checking gesture");
                return Some(LockEvent::Attempted(self.attempt()));
            }
        }
        None
    }

    /// Capture a gesture while the record button is held and store it as the
    /// new reference.
    pub fn record(&mut self) -> Result<RecordOutcome, LockError> {
        let (signature, smoothed, iterations, _) = self.capture(AcquisitionMode::Record);

        self.store.save(&signature)?;
        tracing::info!(len = signature.len(), smoothed, "Stored new reference gesture");

        if let Some(ref audit) = self.audit {
            audit.record_recording();
        }

        Ok(RecordOutcome {
            signature,
            smoothed,
            iterations,
        })
    }

    /// Capture a gesture while the attempt button is held and compare it with
    /// the stored reference.
    pub fn attempt(&mut self) -> UnlockOutcome {
        let (attempt, _, _, dropped) = self.capture(AcquisitionMode::Attempt);

        let reference = match self.store.load() {
            Ok(reference) if !reference.is_empty() => Some(reference),
            Ok(_) => {
                tracing::warn!("Stored reference is empty");
                None
            }
            Err(e) => {
                tracing::warn!("No usable reference: {e}");
                None
            }
        };

        self.feedback.clear_indicators();

        let policy = &self.settings.policy;
        let (verdict, distance) = match reference {
            None => (Verdict::Reject(RejectReason::NoReference), None),
            Some(reference) => match dtw_distance(reference.as_slice(), attempt.as_slice()) {
                Ok(distance) => (policy.evaluate(distance, attempt.len()), Some(distance)),
                // Empty attempt: there is nothing to compare.
                Err(_) => (policy.evaluate(f32::NAN, attempt.len()), None),
            },
        };

        tracing::info!(
            ?distance,
            attempt_len = attempt.len(),
            ?verdict,
            "Unlock attempt evaluated"
        );

        self.play_result(verdict.is_accept());

        if let Some(ref audit) = self.audit {
            audit.record_attempt(verdict.is_accept());
            audit.record_dropped_samples(dropped as u64);
        }

        UnlockOutcome {
            verdict,
            distance,
            attempt,
            dropped,
        }
    }

    /// Shared capture path: beep, acquire, smooth, beep.
    fn capture(&mut self, mode: AcquisitionMode) -> (Signature, bool, usize, usize) {
        let button = match mode {
            AcquisitionMode::Record => Button::Record,
            AcquisitionMode::Attempt => Button::Attempt,
        };

        self.feedback.clear_indicators();
        self.feedback.tone(START_TONE_HZ, TONE_MS);

        let report = acquire(
            mode,
            &self.settings.acquisition,
            &mut self.sensor,
            &mut self.feedback,
            &mut self.clock,
            |sensor: &mut S| sensor.is_pressed(button),
        );

        let mut signature = report.signature;
        let smoothed = match smooth(
            &mut signature,
            self.settings.window_size,
            self.settings.smoothing_mode,
        ) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Smoothing skipped: {e}");
                if let Some(ref audit) = self.audit {
                    audit.record_smoothing_skipped();
                }
                false
            }
        };

        tracing::debug!(?mode, values = ?signature, "Captured gesture");
        self.feedback.tone(END_TONE_HZ, TONE_MS);

        (signature, smoothed, report.iterations, report.dropped)
    }

    fn play_result(&mut self, accepted: bool) {
        if accepted {
            self.feedback.clear_indicators();
            self.feedback.tone(ACCEPT_TONE_HZ, TONE_MS);
            for i in 0..INDICATOR_COUNT {
                self.feedback.set_indicator(i, Rgb::GREEN);
                self.clock.wait(RESULT_STEP);
            }
        } else {
            self.feedback.tone(REJECT_TONE_HZ, TONE_MS);
            self.clock.wait(Duration::from_millis(TONE_MS as u64));
            self.feedback.tone(REJECT_TONE_HZ, TONE_MS);
            for i in 0..INDICATOR_COUNT {
                self.feedback.set_indicator(i, Rgb::RED);
            }
            self.clock.wait(RESULT_STEP);
        }
        self.feedback.clear_indicators();
    }

    pub fn settings(&self) -> &LockSettings {
        &self.settings
    }

    pub fn store(&self) -> &SignatureStore<M> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SignatureStore<M> {
        &mut self.store
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

/// Lock errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockError {
    /// The reference could not be written
    Store(StoreError),
}

impl fmt::Display for LockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockError::Store(e) => write!(f, "Could not store reference: {e}"),
        }
    }
}

impl std::error::Error for LockError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LockError::Store(e) => Some(e),
        }
    }
}

impl From<StoreError> for LockError {
    fn from(e: StoreError) -> Self {
        LockError::Store(e)
    }
}
