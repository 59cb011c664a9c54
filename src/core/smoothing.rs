//! Moving-average smoothing applied to a captured signature before it is
//! stored or matched.
//!
//! The window slides over `len - window + 1` start positions and each start
//! position is overwritten with the mean of the window beginning there. In
//! the default tail-preserving mode the last `window - 1` samples are left as
//! captured and the length does not change. Stored references were smoothed
//! this way, so the DTW threshold is tuned against it.

use crate::core::signature::Signature;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default moving-average window.
pub const WINDOW_SIZE: usize = 5;

/// What happens to the samples the window never starts on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingMode {
    /// Keep the unsmoothed tail; length is unchanged
    #[default]
    TailPreserving,
    /// Drop the unsmoothed tail; length becomes `len - window + 1`
    Truncating,
}

/// Smooth `signature` in place with a moving average of `window` samples.
///
/// Returns `SmoothingError::TooShort` and leaves the signature untouched when
/// it holds fewer than `window` samples.
pub fn smooth(
    signature: &mut Signature,
    window: usize,
    mode: SmoothingMode,
) -> Result<(), SmoothingError> {
    if window == 0 {
        return Err(SmoothingError::ZeroWindow);
    }

    let len = signature.len();
    if len < window {
        return Err(SmoothingError::TooShort { len, window });
    }

    let values = signature.as_mut_slice();
    // Each write lands at `i`, which no later window reads.
    for i in 0..=(len - window) {
        let sum: f32 = values[i..i + window].iter().sum();
        values[i] = sum / window as f32;
    }

    if mode == SmoothingMode::Truncating {
        signature.truncate(len - window + 1);
    }

    Ok(())
}

/// Smoothing errors. Both are non-fatal: callers carry on with the
/// unsmoothed signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmoothingError {
    TooShort { len: usize, window: usize },
    ZeroWindow,
}

impl fmt::Display for SmoothingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SmoothingError::TooShort { len, window } => write!(
                f,
                "Input of {len} samples is shorter than the smoothing window ({window})"
            ),
            SmoothingError::ZeroWindow => write!(f, "Smoothing window must be at least 1"),
        }
    }
}

impl std::error::Error for SmoothingError {}
