//! Counter-based audit log.
//!
//! Only counts are kept: no signatures, distances or timestamps of
//! individual attempts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Lock usage counters for the current session, optionally persisted.
#[derive(Debug)]
pub struct AuditLog {
    /// Reference signatures recorded
    recordings: AtomicU64,
    /// Unlock attempts evaluated
    attempts: AtomicU64,
    /// Attempts accepted
    accepted: AtomicU64,
    /// Attempts rejected
    rejected: AtomicU64,
    /// NaN samples dropped during attempts
    samples_dropped: AtomicU64,
    /// Captures too short to smooth
    smoothing_skipped: AtomicU64,
    /// Identifier of this session
    session_id: Uuid,
    /// Session start time
    session_start: DateTime<Utc>,
    /// Path for persisting stats
    persist_path: Option<PathBuf>,
}

impl AuditLog {
    /// Create a new audit log.
    pub fn new() -> Self {
        Self {
            recordings: AtomicU64::new(0),
            attempts: AtomicU64::new(0),
            accepted: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            samples_dropped: AtomicU64::new(0),
            smoothing_skipped: AtomicU64::new(0),
            session_id: Uuid::new_v4(),
            session_start: Utc::now(),
            persist_path: None,
        }
    }

    /// Create an audit log that resumes from, and saves to, `path`.
    pub fn with_persistence(path: PathBuf) -> Self {
        let mut log = Self::new();
        log.persist_path = Some(path);

        if let Err(e) = log.load() {
            tracing::warn!("Could not load previous audit stats: {e}");
        }

        log
    }

    pub fn record_recording(&self) {
        self.recordings.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an evaluated attempt and its outcome.
    pub fn record_attempt(&self, accepted: bool) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        if accepted {
            self.accepted.fetch_add(1, Ordering::Relaxed);
        } else {
            self.rejected.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_dropped_samples(&self, count: u64) {
        self.samples_dropped.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_smoothing_skipped(&self) {
        self.smoothing_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current statistics.
    pub fn stats(&self) -> AuditStats {
        AuditStats {
            recordings: self.recordings.load(Ordering::Relaxed),
            attempts: self.attempts.load(Ordering::Relaxed),
            accepted: self.accepted.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            samples_dropped: self.samples_dropped.load(Ordering::Relaxed),
            smoothing_skipped: self.smoothing_skipped.load(Ordering::Relaxed),
            session_id: self.session_id,
            session_start: self.session_start,
            session_duration_secs: (Utc::now() - self.session_start).num_seconds().max(0) as u64,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let stats = self.stats();
        format!(
            "Lock Statistics:\n\
             - Gestures recorded: {}\n\
             - Unlock attempts: {}\n\
             - Accepted: {}\n\
             - Rejected: {}\n\
             - Faulty samples dropped: {}\n\
             - Captures too short to smooth: {}\n\
             - Session: {} ({} seconds)",
            stats.recordings,
            stats.attempts,
            stats.accepted,
            stats.rejected,
            stats.samples_dropped,
            stats.smoothing_skipped,
            stats.session_id,
            stats.session_duration_secs
        )
    }

    /// Save stats to disk.
    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let stats = self.stats();
            let persisted = PersistedStats {
                recordings: stats.recordings,
                attempts: stats.attempts,
                accepted: stats.accepted,
                rejected: stats.rejected,
                samples_dropped: stats.samples_dropped,
                smoothing_skipped: stats.smoothing_skipped,
                last_updated: Utc::now(),
            };

            let json = serde_json::to_string_pretty(&persisted).map_err(std::io::Error::other)?;

            std::fs::write(path, json)?;
        }
        Ok(())
    }

    /// Load stats from disk.
    fn load(&mut self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let persisted: PersistedStats =
                    serde_json::from_str(&content).map_err(std::io::Error::other)?;

                self.recordings
                    .store(persisted.recordings, Ordering::Relaxed);
                self.attempts.store(persisted.attempts, Ordering::Relaxed);
                self.accepted.store(persisted.accepted, Ordering::Relaxed);
                self.rejected.store(persisted.rejected, Ordering::Relaxed);
                self.samples_dropped
                    .store(persisted.samples_dropped, Ordering::Relaxed);
                self.smoothing_skipped
                    .store(persisted.smoothing_skipped, Ordering::Relaxed);
            }
        }
        Ok(())
    }

    /// Reset all counters.
    pub fn reset(&self) {
        self.recordings.store(0, Ordering::Relaxed);
        self.attempts.store(0, Ordering::Relaxed);
        self.accepted.store(0, Ordering::Relaxed);
        self.rejected.store(0, Ordering::Relaxed);
        self.samples_dropped.store(0, Ordering::Relaxed);
        self.smoothing_skipped.store(0, Ordering::Relaxed);
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of audit statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditStats {
    pub recordings: u64,
    pub attempts: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub samples_dropped: u64,
    pub smoothing_skipped: u64,
    pub session_id: Uuid,
    pub session_start: DateTime<Utc>,
    pub session_duration_secs: u64,
}

/// Stats format for persistence.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedStats {
    recordings: u64,
    attempts: u64,
    accepted: u64,
    rejected: u64,
    samples_dropped: u64,
    smoothing_skipped: u64,
    last_updated: DateTime<Utc>,
}

/// Thread-safe shared audit log.
pub type SharedAuditLog = Arc<AuditLog>;

/// Create a new shared audit log.
pub fn create_shared_log() -> SharedAuditLog {
    Arc::new(AuditLog::new())
}

/// Create a new shared audit log with persistence.
pub fn create_shared_log_with_persistence(path: PathBuf) -> SharedAuditLog {
    Arc::new(AuditLog::with_persistence(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_counting() {
        let log = AuditLog::new();

        log.record_attempt(true);
        log.record_attempt(false);
        log.record_attempt(false);
        log.record_recording();

        let stats = log.stats();
        assert_eq!(stats.attempts, 3);
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.rejected, 2);
        assert_eq!(stats.recordings, 1);
    }

    #[test]
    fn test_reset() {
        let log = AuditLog::new();

        log.record_dropped_samples(7);
        log.record_smoothing_skipped();
        log.reset();

        let stats = log.stats();
        assert_eq!(stats.samples_dropped, 0);
        assert_eq!(stats.smoothing_skipped, 0);
    }

    #[test]
    fn test_persistence_resumes_counts() {
        let path = std::env::temp_dir()
            .join("gesture-lock-test")
            .join(format!("audit-{}.json", Uuid::new_v4()));

        let log = AuditLog::with_persistence(path.clone());
        log.record_attempt(true);
        log.record_recording();
        log.save().unwrap();

        let resumed = AuditLog::with_persistence(path.clone());
        let stats = resumed.stats();
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.recordings, 1);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_reset_persists() {
        let path = std::env::temp_dir()
            .join("gesture-lock-test")
            .join(format!("audit-{}.json", Uuid::new_v4()));

        let log = AuditLog::with_persistence(path.clone());
        log.record_attempt(false);
        log.save().unwrap();

        let log = AuditLog::with_persistence(path.clone());
        assert_eq!(log.stats().rejected, 1);
        log.reset();
        log.save().unwrap();

        let stats = AuditLog::with_persistence(path.clone()).stats();
        assert_eq!(stats.attempts, 0);
        assert_eq!(stats.rejected, 0);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_summary_format() {
        let summary = AuditLog::new().summary();

        assert!(summary.contains("Gestures recorded"));
        assert!(summary.contains("Unlock attempts"));
        assert!(summary.contains("Rejected"));
    }
}
