//! Channel-fed sensor.
//!
//! Readings arrive over a bounded crossbeam channel from a producer thread
//! (a replay file, a serial bridge). The button of the active phase reads as
//! held while readings keep arriving and is released once the producer
//! drops its sender and the queue is drained.

use crate::sensor::types::{Button, ButtonSource, MotionSensor, MotionVector};
use crossbeam_channel::{bounded, Receiver, Sender};

/// Default queue depth.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1_024;

/// A sensor whose readings and button hold come from a channel.
pub struct ChannelSensor {
    button: Button,
    receiver: Receiver<MotionVector>,
    /// Reading pulled while answering `is_pressed`, handed out next
    pending: Option<MotionVector>,
}

impl ChannelSensor {
    /// Create a sensor that holds `button` while the returned sender is alive.
    pub fn new(button: Button, capacity: usize) -> (Sender<MotionVector>, Self) {
        let (sender, receiver) = bounded(capacity);
        (
            sender,
            Self {
                button,
                receiver,
                pending: None,
            },
        )
    }
}

impl ButtonSource for ChannelSensor {
    fn is_pressed(&mut self, button: Button) -> bool {
        if button != self.button {
            return false;
        }
        if self.pending.is_some() {
            return true;
        }

        // Blocks until the producer sends or hangs up.
        match self.receiver.recv() {
            Ok(reading) => {
                self.pending = Some(reading);
                true
            }
            Err(_) => false,
        }
    }
}

impl MotionSensor for ChannelSensor {
    fn read_motion(&mut self) -> MotionVector {
        self.pending
            .take()
            .or_else(|| self.receiver.try_recv().ok())
            .unwrap_or_else(MotionVector::fault)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_until_sender_dropped() {
        let (sender, mut sensor) = ChannelSensor::new(Button::Attempt, 8);
        sender.send(MotionVector::new(1.0, 0.0, 0.0)).unwrap();
        sender.send(MotionVector::new(2.0, 0.0, 0.0)).unwrap();
        drop(sender);

        assert!(!sensor.is_pressed(Button::Record));

        assert!(sensor.is_pressed(Button::Attempt));
        assert!(sensor.is_pressed(Button::Attempt));
        assert_eq!(sensor.read_motion().x, 1.0);

        assert!(sensor.is_pressed(Button::Attempt));
        assert_eq!(sensor.read_motion().x, 2.0);

        assert!(!sensor.is_pressed(Button::Attempt));
        assert!(sensor.read_motion().x.is_nan());
    }
}
