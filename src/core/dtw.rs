//! Dynamic time warping distance between two signatures.
//!
//! The cost of aligning two samples is their absolute difference. The
//! distance is the cheapest cumulative cost over every monotonic, contiguous
//! warping path from `(0, 0)` to `(n - 1, m - 1)`, so two recordings of the
//! same gesture performed at different speeds still score close together.
//!
//! Only one row of the cost matrix is kept. It is sized to the second
//! sequence and dropped when the call returns.

use std::fmt;

/// Compute the DTW distance between `a` (length n) and `b` (length m).
///
/// Runs in O(n·m) time and O(m) extra space.
pub fn dtw_distance(a: &[f32], b: &[f32]) -> Result<f32, MatchError> {
    if a.is_empty() || b.is_empty() {
        return Err(MatchError::EmptySequence);
    }

    let mut row = Vec::with_capacity(b.len());

    // First row: the path can only advance along b.
    let mut acc = 0.0f32;
    for &bj in b {
        acc += (a[0] - bj).abs();
        row.push(acc);
    }

    for &ai in &a[1..] {
        // Diagonal predecessor for column j, i.e. row[j - 1] from the last pass.
        let mut diagonal = row[0];
        row[0] += (ai - b[0]).abs();

        for j in 1..b.len() {
            let above = row[j];
            let left = row[j - 1];
            row[j] = diagonal.min(above).min(left) + (ai - b[j]).abs();
            diagonal = above;
        }
    }

    Ok(row[b.len() - 1])
}

/// Matching errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// One of the sequences had no samples
    EmptySequence,
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::EmptySequence => write!(f, "Cannot match an empty sequence"),
        }
    }
}

impl std::error::Error for MatchError {}
