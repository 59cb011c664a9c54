//! Gesture Lock - unlock a device by repeating a recorded motion.
//!
//! The user records a gesture by holding the record button and moving the
//! device. The accelerometer magnitude is sampled at a fixed cadence,
//! smoothed with a moving average, and stored as the reference signature.
//! To unlock, the user holds the attempt button and repeats the gesture; the
//! attempt is compared with the reference by dynamic time warping and
//! accepted if the distance is below a threshold and the attempt is long
//! enough.
//!
//! This is a coarse motion-similarity filter, not authentication-grade
//! biometrics.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Gesture Lock                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐       │
//! │  │   Sensor    │──▶│ Acquisition │──▶│  Smoothing  │       │
//! │  │ (buttons)   │   │ (30ms tick) │   │ (window 5)  │       │
//! │  └─────────────┘   └─────────────┘   └─────────────┘       │
//! │                                          │      │           │
//! │                                  record  ▼      ▼ attempt   │
//! │                              ┌─────────────┐ ┌─────────────┐│
//! │                              │  Signature  │─▶ DTW + Policy ││
//! │                              │    Store    │ │             ││
//! │                              └─────────────┘ └─────────────┘│
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use gesture_lock::{
//!     acquisition::ManualClock,
//!     config::LockSettings,
//!     sensor::{Button, NullFeedback, ScriptedSensor},
//!     storage::{MemoryMedium, SignatureStore},
//!     GestureLock,
//! };
//!
//! let gesture = [1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 1.0, 1.0];
//! let store = SignatureStore::new(MemoryMedium::default(), 0).unwrap();
//! let mut lock = GestureLock::new(
//!     ScriptedSensor::from_magnitudes(Button::Record, &gesture, 10.0),
//!     NullFeedback,
//!     ManualClock::new(),
//!     store,
//!     LockSettings::default(),
//! );
//!
//! lock.record().unwrap();
//! *lock.sensor_mut() = ScriptedSensor::from_magnitudes(Button::Attempt, &gesture, 10.0);
//! assert!(lock.attempt().is_accept());
//! ```

pub mod acquisition;
pub mod audit;
pub mod config;
pub mod core;
pub mod lock;
pub mod sensor;
pub mod storage;

// Re-export key types at crate root for convenience
pub use acquisition::{acquire, AcquisitionMode, ManualClock, SampleClock, SleepClock};
pub use audit::{AuditLog, AuditStats, SharedAuditLog};
pub use config::{Config, ConfigError, LockSettings};
pub use crate::core::{
    decide, dtw_distance, smooth, DecisionPolicy, RejectReason, Signature, SignatureSummary,
    SmoothingMode, Verdict, MAX_SIZE,
};
pub use lock::{GestureLock, LockError, LockEvent, RecordOutcome, UnlockOutcome};
pub use storage::{FileMedium, MemoryMedium, PersistentMedium, SignatureStore, StoreError};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
