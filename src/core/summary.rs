//! Compact descriptive statistics for a signature.

use crate::core::signature::Signature;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Summary of a signature's samples, used by `show` and in log lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureSummary {
    pub len: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Sample standard deviation; NaN for a single sample
    pub std_dev: f64,
}

impl SignatureSummary {
    /// Summarize a signature. Returns `None` for an empty signature.
    pub fn from_signature(signature: &Signature) -> Option<Self> {
        if signature.is_empty() {
            return None;
        }

        let values: Vec<f64> = signature.iter().map(|&v| v as f64).collect();

        Some(Self {
            len: values.len(),
            min: Statistics::min(values.iter()),
            max: Statistics::max(values.iter()),
            mean: values.iter().mean(),
            std_dev: values.iter().std_dev(),
        })
    }
}
