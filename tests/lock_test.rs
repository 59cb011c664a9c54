//! Integration tests for the record and unlock pipeline

use gesture_lock::{
    acquisition::ManualClock,
    audit::create_shared_log,
    config::LockSettings,
    sensor::{
        spawn_feeder, Button, ChannelSensor, MotionVector, NullFeedback, RecordingFeedback,
        ScriptedSensor,
    },
    storage::{FileMedium, MemoryMedium, PersistentMedium, SignatureStore, DEFAULT_BASE_ADDR},
    GestureLock, RejectReason, Verdict, MAX_SIZE,
};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

const REFERENCE: [f32; 8] = [1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 1.0, 1.0];

fn trace(magnitudes: &[f32]) -> Vec<MotionVector> {
    magnitudes
        .iter()
        .map(|m| MotionVector::new(0.0, 0.0, m * 10.0))
        .collect()
}

fn replayed(button: Button, readings: Vec<MotionVector>) -> ChannelSensor {
    let (sender, sensor) = ChannelSensor::new(button, 2);
    spawn_feeder(readings, sender, Arc::new(AtomicBool::new(true)));
    sensor
}

fn memory_lock<S>(sensor: S) -> GestureLock<S, RecordingFeedback, ManualClock, MemoryMedium>
where
    S: gesture_lock::sensor::MotionSensor + gesture_lock::sensor::ButtonSource,
{
    GestureLock::new(
        sensor,
        RecordingFeedback::new(),
        ManualClock::new(),
        SignatureStore::new(MemoryMedium::default(), DEFAULT_BASE_ADDR).unwrap(),
        LockSettings::default(),
    )
}

fn temp_image(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("gesture-lock-{name}-{}.bin", uuid::Uuid::new_v4()))
}

#[test]
fn test_replayed_gesture_unlocks() {
    let mut lock = memory_lock(replayed(Button::Record, trace(&REFERENCE)));

    let recorded = lock.record().unwrap();
    assert_eq!(recorded.signature.len(), 8);
    assert_eq!(recorded.iterations, 8);

    *lock.sensor_mut() = replayed(Button::Attempt, trace(&REFERENCE));
    let outcome = lock.attempt();

    assert_eq!(outcome.verdict, Verdict::Accept);
    assert!(outcome.distance.unwrap().abs() < 1e-6);
    // One 30ms wait per sample, plus the unlock animation.
    assert!(lock.clock().waits >= 16);
}

#[test]
fn test_time_stretched_gesture_unlocks() {
    let mut lock = memory_lock(replayed(Button::Record, trace(&REFERENCE)));
    lock.record().unwrap();

    let stretched = [1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 2.0, 2.0, 1.0, 1.0, 1.0];
    *lock.sensor_mut() = replayed(Button::Attempt, trace(&stretched));
    let outcome = lock.attempt();

    assert!(outcome.is_accept());
    assert!((outcome.distance.unwrap() - 1.2).abs() < 1e-4);
}

#[test]
fn test_constant_gesture_rejected() {
    let mut lock = memory_lock(replayed(Button::Record, trace(&REFERENCE)));
    lock.record().unwrap();

    *lock.sensor_mut() = replayed(Button::Attempt, trace(&[3.0; 8]));
    let outcome = lock.attempt();

    assert_eq!(
        outcome.verdict,
        Verdict::Reject(RejectReason::DistanceTooLarge)
    );
    assert!((outcome.distance.unwrap() - 11.8).abs() < 1e-4);
}

#[test]
fn test_short_attempt_rejected_even_when_close() {
    let mut lock = memory_lock(replayed(Button::Record, trace(&REFERENCE)));
    lock.record().unwrap();

    *lock.sensor_mut() = replayed(Button::Attempt, trace(&REFERENCE[..4]));
    let outcome = lock.attempt();

    assert_eq!(outcome.verdict, Verdict::Reject(RejectReason::TooShort));
    assert_eq!(outcome.attempt.len(), 4);
}

#[test]
fn test_faulty_attempt_samples_dropped() {
    let mut lock = memory_lock(replayed(Button::Record, trace(&REFERENCE)));
    lock.record().unwrap();

    let mut readings = trace(&REFERENCE);
    readings.insert(3, MotionVector::fault());
    *lock.sensor_mut() = replayed(Button::Attempt, readings);
    let outcome = lock.attempt();

    assert_eq!(outcome.dropped, 1);
    assert_eq!(outcome.attempt.len(), 8);
    assert!(outcome.is_accept());
}

#[test]
fn test_faulty_reference_rejects_every_attempt() {
    let mut readings = trace(&REFERENCE);
    readings[6] = MotionVector::fault();
    let mut lock = memory_lock(replayed(Button::Record, readings));

    let recorded = lock.record().unwrap();
    assert_eq!(recorded.signature.len(), 8);
    assert!(recorded.signature.iter().any(|v| v.is_nan()));
    assert!(lock.store().load().unwrap().iter().any(|v| v.is_nan()));

    *lock.sensor_mut() = replayed(Button::Attempt, trace(&REFERENCE));
    let outcome = lock.attempt();

    assert_eq!(outcome.verdict, Verdict::Reject(RejectReason::NotANumber));
    assert!(outcome.distance.unwrap().is_nan());
    assert_eq!(outcome.dropped, 0);
}

#[test]
fn test_long_gesture_capped_at_capacity() {
    let magnitudes = vec![1.5; MAX_SIZE + 20];
    let mut lock = memory_lock(ScriptedSensor::from_magnitudes(
        Button::Record,
        &magnitudes,
        10.0,
    ));

    let recorded = lock.record().unwrap();

    assert_eq!(recorded.signature.len(), MAX_SIZE);
    assert_eq!(recorded.iterations, MAX_SIZE);
    assert_eq!(lock.store().load().unwrap().len(), MAX_SIZE);
}

#[test]
fn test_reference_survives_restart() {
    let path = temp_image("restart");

    {
        let store =
            SignatureStore::new(FileMedium::open(&path, 1024).unwrap(), DEFAULT_BASE_ADDR)
                .unwrap();
        let mut lock = GestureLock::new(
            ScriptedSensor::from_magnitudes(Button::Record, &REFERENCE, 10.0),
            NullFeedback,
            ManualClock::new(),
            store,
            LockSettings::default(),
        );
        lock.record().unwrap();
    }

    let store =
        SignatureStore::new(FileMedium::open(&path, 1024).unwrap(), DEFAULT_BASE_ADDR).unwrap();
    let mut lock = GestureLock::new(
        ScriptedSensor::from_magnitudes(Button::Attempt, &REFERENCE, 10.0),
        NullFeedback,
        ManualClock::new(),
        store,
        LockSettings::default(),
    );
    assert!(lock.attempt().is_accept());

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_corrupt_length_fails_closed() {
    let mut lock = memory_lock(ScriptedSensor::from_magnitudes(
        Button::Record,
        &REFERENCE,
        10.0,
    ));
    lock.record().unwrap();

    lock.store_mut()
        .medium_mut()
        .write_bytes(DEFAULT_BASE_ADDR, &500i32.to_le_bytes())
        .unwrap();

    *lock.sensor_mut() = ScriptedSensor::from_magnitudes(Button::Attempt, &REFERENCE, 10.0);
    let outcome = lock.attempt();

    assert_eq!(outcome.verdict, Verdict::Reject(RejectReason::NoReference));
    assert_eq!(outcome.distance, None);
}

#[test]
fn test_erased_medium_has_no_reference() {
    let mut lock = memory_lock(ScriptedSensor::from_magnitudes(
        Button::Record,
        &REFERENCE,
        10.0,
    ));
    lock.record().unwrap();
    lock.store_mut().erase().unwrap();

    *lock.sensor_mut() = ScriptedSensor::from_magnitudes(Button::Attempt, &REFERENCE, 10.0);
    assert_eq!(
        lock.attempt().verdict,
        Verdict::Reject(RejectReason::NoReference)
    );
}

#[test]
fn test_audit_tracks_session() {
    let audit = create_shared_log();
    let mut lock = memory_lock(ScriptedSensor::from_magnitudes(
        Button::Record,
        &REFERENCE,
        10.0,
    ))
    .with_audit(audit.clone());

    lock.record().unwrap();
    for attempt in [&REFERENCE[..], &[3.0; 8][..], &REFERENCE[..]] {
        *lock.sensor_mut() = ScriptedSensor::from_magnitudes(Button::Attempt, attempt, 10.0);
        lock.attempt();
    }

    let stats = audit.stats();
    assert_eq!(stats.recordings, 1);
    assert_eq!(stats.attempts, 3);
    assert_eq!(stats.accepted, 2);
    assert_eq!(stats.rejected, 1);
}
