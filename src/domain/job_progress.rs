use chrono::{DateTime, Utc};
use tokio::time::Instant;

use super::JobStatus;

/// Snapshot of one cleaning job's progress.
#[derive(Debug, Clone, PartialEq)]
pub struct JobProgress {
    pub completed: usize,
    pub total: usize,
    pub status: JobStatus,
    pub error_message: Option<String>,
    pub started_at: DateTime<Utc>,
    pub expires_at: Option<Instant>,
}

impl JobProgress {
    pub fn new(total: usize) -> Self {
        Self {
            completed: 0,
            total,
            status: JobStatus::Processing,
            error_message: None,
            started_at: Utc::now(),
            expires_at: None,
        }
    }

    pub fn queued() -> Self {
        Self {
            status: JobStatus::Queued,
            ..Self::new(0)
        }
    }

    /// Completion percentage; a job with no units reports 0.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.completed as f64 / self.total as f64) * 100.0
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
