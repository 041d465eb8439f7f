use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

use crate::application::ports::ProgressSink;
use crate::domain::{JobProgress, JobStatus, SessionId};

/// In-memory progress store keyed by session.
///
/// Entries live from job start until their retention window passes; expired
/// entries are removed the next time they are read.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    sessions: DashMap<SessionId, JobProgress>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session that has been accepted but not started.
    pub fn enqueue(&self, session: SessionId) {
        self.sessions.insert(session, JobProgress::queued());
    }

    pub fn start(&self, session: SessionId, total: usize) {
        self.sessions
            .entry(session)
            .and_modify(|progress| {
                progress.completed = 0;
                progress.total = total;
                progress.status = JobStatus::Processing;
                progress.error_message = None;
                progress.expires_at = None;
            })
            .or_insert_with(|| JobProgress::new(total));
    }

    /// Records progress. `completed` never moves backwards and terminal
    /// sessions are left untouched.
    pub fn update(&self, session: SessionId, completed: usize, total: usize) {
        let mut progress = self
            .sessions
            .entry(session)
            .or_insert_with(|| JobProgress::new(total));

        if progress.is_terminal() {
            return;
        }
        progress.status = JobStatus::Processing;
        progress.total = total;
        progress.completed = progress.completed.max(completed);
    }

    pub fn get(&self, session: SessionId) -> Result<JobProgress, ProgressError> {
        let now = Instant::now();
        if self
            .sessions
            .remove_if(&session, |_, progress| progress.is_expired(now))
            .is_some()
        {
            tracing::debug!(session_id = %session, "Progress entry expired");
            return Err(ProgressError::NotFound(session));
        }

        self.sessions
            .get(&session)
            .map(|progress| progress.clone())
            .ok_or(ProgressError::NotFound(session))
    }

    pub fn expire(&self, session: SessionId, after: Duration) {
        if let Some(mut progress) = self.sessions.get_mut(&session) {
            progress.expires_at = Some(Instant::now() + after);
        }
    }

    pub fn complete(&self, session: SessionId) {
        if let Some(mut progress) = self.sessions.get_mut(&session) {
            progress.completed = progress.total;
            progress.status = JobStatus::Completed;
        }
    }

    pub fn fail(&self, session: SessionId, message: impl Into<String>) {
        let mut progress = self
            .sessions
            .entry(session)
            .or_insert_with(|| JobProgress::new(0));
        progress.status = JobStatus::Failed;
        progress.error_message = Some(message.into());
    }

    /// Drops every entry whose retention has elapsed. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, progress| !progress.is_expired(now));
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Adapter that forwards dispatcher notifications for one session.
    pub fn sink(self: &Arc<Self>, session: SessionId) -> Arc<dyn ProgressSink> {
        Arc::new(SessionProgressSink {
            tracker: Arc::clone(self),
            session,
        })
    }

    /// Periodically purges expired sessions until the returned task is aborted.
    pub fn spawn_reaper(self: &Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        let tracker = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let removed = tracker.purge_expired();
                if removed > 0 {
                    tracing::debug!(removed, "Purged expired progress entries");
                }
            }
        })
    }
}

struct SessionProgressSink {
    tracker: Arc<ProgressTracker>,
    session: SessionId,
}

impl ProgressSink for SessionProgressSink {
    fn on_progress(&self, completed: usize, total: usize) {
        self.tracker.update(self.session, completed, total);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgressError {
    #[error("session not found: {0}")]
    NotFound(SessionId),
}
