//! Replay of recorded accelerometer traces.
//!
//! A trace is plain text with one `x,y,z` reading per line. Blank lines and
//! lines starting with `#` are skipped; `nan` is accepted on any axis so a
//! faulted reading can be replayed.

use crate::sensor::types::MotionVector;
use crossbeam_channel::Sender;
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Parse a trace.
pub fn parse_trace(content: &str) -> Result<Vec<MotionVector>, ReplayError> {
    let mut readings = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let axes: Vec<f32> = line
            .split(',')
            .map(|field| field.trim().parse::<f32>())
            .collect::<Result<_, _>>()
            .map_err(|e| ReplayError::Parse {
                line: index + 1,
                message: e.to_string(),
            })?;

        match axes.as_slice() {
            [x, y, z] => readings.push(MotionVector::new(*x, *y, *z)),
            _ => {
                return Err(ReplayError::Parse {
                    line: index + 1,
                    message: format!("expected 3 fields, found {}", axes.len()),
                })
            }
        }
    }

    Ok(readings)
}

/// Read and parse a trace file.
pub fn load_trace(path: &Path) -> Result<Vec<MotionVector>, ReplayError> {
    let content = std::fs::read_to_string(path).map_err(|e| ReplayError::Io(e.to_string()))?;
    parse_trace(&content)
}

/// Feed `readings` into `sender` from a background thread.
///
/// The channel is bounded, so the feed runs at the pace the consumer samples
/// at. Clearing `running` stops the feed early. The sender is dropped when
/// the thread exits, which releases the button. Returns the number sent.
pub fn spawn_feeder(
    readings: Vec<MotionVector>,
    sender: Sender<MotionVector>,
    running: Arc<AtomicBool>,
) -> JoinHandle<usize> {
    thread::spawn(move || {
        let mut sent = 0;
        for reading in readings {
            if !running.load(Ordering::SeqCst) {
                break;
            }
            if sender.send(reading).is_err() {
                break;
            }
            sent += 1;
        }
        sent
    })
}

/// Trace replay errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    Io(String),
    Parse { line: usize, message: String },
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayError::Io(e) => write!(f, "IO error: {e}"),
            ReplayError::Parse { line, message } => write!(f, "Line {line}: {message}"),
        }
    }
}

impl std::error::Error for ReplayError {}
