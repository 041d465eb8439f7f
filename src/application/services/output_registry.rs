use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

use crate::domain::SessionId;

#[derive(Debug, Clone)]
struct RenderedOutput {
    path: PathBuf,
    expires_at: Instant,
}

/// Rendered outputs of finished sessions, laid out as
/// `<root>/<session>/<file>`.
///
/// An output is downloadable for the retention window after it is
/// registered; after that it is hidden and its session directory is deleted
/// by the next purge.
#[derive(Debug)]
pub struct OutputRegistry {
    root: PathBuf,
    retention: Duration,
    outputs: DashMap<SessionId, RenderedOutput>,
}

impl OutputRegistry {
    pub fn new(root: impl Into<PathBuf>, retention: Duration) -> Self {
        Self {
            root: root.into(),
            retention,
            outputs: DashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn session_dir(&self, session: SessionId) -> PathBuf {
        self.root.join(session.to_string())
    }

    pub fn output_path(&self, session: SessionId, filename: &str) -> PathBuf {
        self.session_dir(session).join(filename)
    }

    pub fn insert(&self, session: SessionId, path: PathBuf) {
        self.outputs.insert(
            session,
            RenderedOutput {
                path,
                expires_at: Instant::now() + self.retention,
            },
        );
    }

    /// Path of a live output; expired outputs are treated as gone.
    pub fn get(&self, session: SessionId) -> Option<PathBuf> {
        let now = Instant::now();
        self.outputs
            .get(&session)
            .filter(|output| now < output.expires_at)
            .map(|output| output.path.clone())
    }

    pub fn remove(&self, session: SessionId) -> Option<PathBuf> {
        self.outputs.remove(&session).map(|(_, output)| output.path)
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Forgets the session and deletes its directory, if any.
    pub async fn discard(&self, session: SessionId) {
        self.outputs.remove(&session);
        let dir = self.session_dir(session);
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => tracing::debug!(session_id = %session, "Session output deleted"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(session_id = %session, dir = %dir.display(), error = %e, "Failed to delete session output");
            }
        }
    }

    /// Deletes every output whose retention has elapsed. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let expired: Vec<SessionId> = self
            .outputs
            .iter()
            .filter(|entry| now >= entry.expires_at)
            .map(|entry| *entry.key())
            .collect();

        for session in &expired {
            self.discard(*session).await;
        }
        expired.len()
    }

    /// Periodically purges expired outputs until the returned task is aborted.
    pub fn spawn_reaper(self: &Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        let registry = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let removed = registry.purge_expired().await;
                if removed > 0 {
                    tracing::debug!(removed, "Purged expired outputs");
                }
            }
        })
    }
}
