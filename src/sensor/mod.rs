//! Board collaborators: accelerometer, buttons, and LED/speaker feedback.
//!
//! The lock only talks to these through traits so the same pipeline runs
//! against a replayed trace, a scripted test double, or real hardware.

pub mod channel;
pub mod feedback;
pub mod replay;
pub mod scripted;
pub mod types;

// Re-export commonly used types
pub use channel::{ChannelSensor, DEFAULT_CHANNEL_CAPACITY};
pub use feedback::{FeedbackCall, LogFeedback, NullFeedback, RecordingFeedback};
pub use replay::{load_trace, parse_trace, spawn_feeder, ReplayError};
pub use scripted::ScriptedSensor;
pub use types::{
    Button, ButtonSource, Feedback, MotionSensor, MotionVector, Rgb, INDICATOR_COUNT,
    NORMALIZE_FACTOR,
};
