//! Core signal pipeline for the gesture lock.
//!
//! This module contains:
//! - The fixed-capacity signature buffer
//! - Moving-average smoothing
//! - DTW matching and the accept/reject policy
//! - Descriptive statistics for diagnostics

pub mod decision;
pub mod dtw;
pub mod signature;
pub mod smoothing;
pub mod summary;

// Re-export commonly used types
pub use decision::{
    decide, DecisionPolicy, RejectReason, Verdict, DTW_THRESHOLD, MIN_LENGTH,
};
pub use dtw::{dtw_distance, MatchError};
pub use signature::{Signature, SignatureError, MAX_SIZE};
pub use smoothing::{smooth, SmoothingError, SmoothingMode, WINDOW_SIZE};
pub use summary::SignatureSummary;
