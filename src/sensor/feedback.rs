//! Feedback implementations.

use crate::sensor::types::{Feedback, Rgb};

/// Reports feedback through the log.
#[derive(Debug, Default)]
pub struct LogFeedback;

impl Feedback for LogFeedback {
    fn set_indicator(&mut self, index: usize, color: Rgb) {
        tracing::trace!(index, r = color.r, g = color.g, b = color.b, "indicator");
    }

    fn clear_indicators(&mut self) {
        tracing::trace!("indicators cleared");
    }

    fn tone(&mut self, freq_hz: u32, duration_ms: u32) {
        tracing::debug!(freq_hz, duration_ms, "tone");
    }
}

/// Discards all feedback.
#[derive(Debug, Default)]
pub struct NullFeedback;

impl Feedback for NullFeedback {
    fn set_indicator(&mut self, _index: usize, _color: Rgb) {}
    fn clear_indicators(&mut self) {}
    fn tone(&mut self, _freq_hz: u32, _duration_ms: u32) {}
}

/// One recorded feedback call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackCall {
    Indicator(usize, Rgb),
    Clear,
    Tone { freq_hz: u32, duration_ms: u32 },
}

/// Keeps every call, for assertions.
#[derive(Debug, Default)]
pub struct RecordingFeedback {
    pub calls: Vec<FeedbackCall>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frequencies of every tone played, in order.
    pub fn tones(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                FeedbackCall::Tone { freq_hz, .. } => Some(*freq_hz),
                _ => None,
            })
            .collect()
    }

    /// Number of indicator writes with `color`.
    pub fn indicator_count(&self, color: Rgb) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, FeedbackCall::Indicator(_, rgb) if *rgb == color))
            .count()
    }
}

impl Feedback for RecordingFeedback {
    fn set_indicator(&mut self, index: usize, color: Rgb) {
        self.calls.push(FeedbackCall::Indicator(index, color));
    }

    fn clear_indicators(&mut self) {
        self.calls.push(FeedbackCall::Clear);
    }

    fn tone(&mut self, freq_hz: u32, duration_ms: u32) {
        self.calls.push(FeedbackCall::Tone {
            freq_hz,
            duration_ms,
        });
    }
}
