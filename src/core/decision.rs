//! Accept/reject decision for an unlock attempt.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default DTW distance below which an attempt is accepted.
pub const DTW_THRESHOLD: f32 = 8.0;

/// Default minimum attempt length.
///
/// Very short attempts can align cheaply against any reference, so they are
/// rejected regardless of distance.
pub const MIN_LENGTH: usize = 5;

/// Accept iff `distance < threshold` and `attempt_len >= min_length`.
pub fn decide(distance: f32, attempt_len: usize, threshold: f32, min_length: usize) -> bool {
    distance < threshold && attempt_len >= min_length
}

/// Why an attempt was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Fewer samples than the minimum length
    TooShort,
    /// Distance at or above the threshold
    DistanceTooLarge,
    /// No usable reference signature in storage
    NoReference,
    /// The distance could not be computed as a number
    NotANumber,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::TooShort => write!(f, "attempt too short"),
            RejectReason::DistanceTooLarge => write!(f, "distance above threshold"),
            RejectReason::NoReference => write!(f, "no reference signature"),
            RejectReason::NotANumber => write!(f, "distance is not a number"),
        }
    }
}

/// Outcome of evaluating an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Accept,
    Reject(RejectReason),
}

impl Verdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

/// Threshold plus minimum-length rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionPolicy {
    pub threshold: f32,
    pub min_length: usize,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            threshold: DTW_THRESHOLD,
            min_length: MIN_LENGTH,
        }
    }
}

impl DecisionPolicy {
    pub fn new(threshold: f32, min_length: usize) -> Self {
        Self {
            threshold,
            min_length,
        }
    }

    /// Evaluate a distance and attempt length, reporting the reason on reject.
    ///
    /// Agrees with [`decide`]: `evaluate(d, n).is_accept() == decide(d, n, ..)`.
    pub fn evaluate(&self, distance: f32, attempt_len: usize) -> Verdict {
        if attempt_len < self.min_length {
            Verdict::Reject(RejectReason::TooShort)
        } else if distance.is_nan() {
            Verdict::Reject(RejectReason::NotANumber)
        } else if decide(distance, attempt_len, self.threshold, self.min_length) {
            Verdict::Accept
        } else {
            Verdict::Reject(RejectReason::DistanceTooLarge)
        }
    }
}
