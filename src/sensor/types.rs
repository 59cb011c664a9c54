//! Types and traits for the board the lock runs on.
//!
//! The lock core treats the accelerometer, the two buttons and the
//! LED/speaker feedback as external collaborators. Everything here is a
//! pure query or a fire-and-forget command.

use serde::{Deserialize, Serialize};

/// Divisor applied to the raw acceleration magnitude.
pub const NORMALIZE_FACTOR: f32 = 10.0;

/// Number of indicator LEDs on the board.
pub const INDICATOR_COUNT: usize = 10;

/// A single 3-axis accelerometer reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionVector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl MotionVector {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// A reading from a faulted sensor.
    pub fn fault() -> Self {
        Self::new(f32::NAN, f32::NAN, f32::NAN)
    }

    /// Euclidean norm divided by `normalize_factor`.
    ///
    /// NaN if any axis is NaN.
    pub fn magnitude(&self, normalize_factor: f32) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt() / normalize_factor
    }
}

/// The two operator buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Button {
    /// Left button: record a new reference gesture
    Record,
    /// Right button: attempt to unlock
    Attempt,
}

/// An indicator colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const YELLOW: Rgb = Rgb::new(255, 255, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const RED: Rgb = Rgb::new(255, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Source of accelerometer readings.
pub trait MotionSensor {
    /// Current reading. No buffering: the value at call time.
    fn read_motion(&mut self) -> MotionVector;
}

/// Source of button state.
pub trait ButtonSource {
    /// Whether `button` is held at call time.
    fn is_pressed(&mut self, button: Button) -> bool;
}

/// LED and speaker output.
pub trait Feedback {
    fn set_indicator(&mut self, index: usize, color: Rgb);
    fn clear_indicators(&mut self);
    fn tone(&mut self, freq_hz: u32, duration_ms: u32);
}
