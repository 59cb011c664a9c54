//! Deterministic in-process sensor for tests and demos.

use crate::sensor::types::{Button, ButtonSource, MotionSensor, MotionVector};
use std::collections::VecDeque;

/// Plays back a fixed list of readings.
///
/// `button` reads as held while readings remain, unless a press limit is set,
/// in which case it releases after that many polls (to model switch bounce).
#[derive(Debug, Clone)]
pub struct ScriptedSensor {
    button: Option<Button>,
    readings: VecDeque<MotionVector>,
    press_limit: Option<usize>,
    polls: usize,
}

impl ScriptedSensor {
    pub fn new(button: Button, readings: impl IntoIterator<Item = MotionVector>) -> Self {
        Self {
            button: Some(button),
            readings: readings.into_iter().collect(),
            press_limit: None,
            polls: 0,
        }
    }

    /// A sensor with no button held.
    pub fn idle() -> Self {
        Self {
            button: None,
            readings: VecDeque::new(),
            press_limit: None,
            polls: 0,
        }
    }

    /// Build readings whose normalized magnitudes equal `magnitudes`.
    pub fn from_magnitudes(button: Button, magnitudes: &[f32], normalize_factor: f32) -> Self {
        Self::new(
            button,
            magnitudes
                .iter()
                .map(|&m| MotionVector::new(0.0, 0.0, m * normalize_factor)),
        )
    }

    /// Release the button after `polls` calls to `is_pressed`.
    pub fn with_press_limit(mut self, polls: usize) -> Self {
        self.press_limit = Some(polls);
        self
    }

    /// Readings not yet consumed.
    pub fn remaining(&self) -> usize {
        self.readings.len()
    }
}

impl ButtonSource for ScriptedSensor {
    fn is_pressed(&mut self, button: Button) -> bool {
        if self.button != Some(button) {
            return false;
        }

        self.polls += 1;
        if let Some(limit) = self.press_limit {
            if self.polls > limit {
                return false;
            }
        }

        !self.readings.is_empty()
    }
}

impl MotionSensor for ScriptedSensor {
    fn read_motion(&mut self) -> MotionVector {
        self.readings.pop_front().unwrap_or_else(MotionVector::fault)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_limit_models_bounce() {
        let mut sensor = ScriptedSensor::new(Button::Record, vec![MotionVector::new(0.0, 0.0, 1.0)])
            .with_press_limit(1);

        assert!(sensor.is_pressed(Button::Record));
        assert!(!sensor.is_pressed(Button::Record));
        assert_eq!(sensor.remaining(), 1);
    }

    #[test]
    fn test_from_magnitudes() {
        let mut sensor = ScriptedSensor::from_magnitudes(Button::Attempt, &[1.5], 10.0);
        assert!((sensor.read_motion().magnitude(10.0) - 1.5).abs() < 1e-6);
        assert!(!sensor.is_pressed(Button::Attempt));
    }
}
