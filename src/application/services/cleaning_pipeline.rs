use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::TextTransformer;
use crate::domain::SessionId;

use super::chunker::ParagraphChunker;
use super::dispatcher::Dispatcher;
use super::progress_tracker::ProgressTracker;
use super::transform_client::{TransformClient, TransformError};

/// Knobs consumed by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub max_chunk_chars: usize,
    pub timeout: Duration,
    pub max_workers: usize,
    pub progress_retention: Duration,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_chunk_chars: 6000,
            timeout: Duration::from_secs(120),
            max_workers: 4,
            progress_retention: Duration::from_secs(300),
        }
    }
}

/// Chunks a document, rewrites every chunk, and reassembles the result while
/// keeping the session's progress entry current.
pub struct CleaningPipeline<B: ?Sized>
where
    B: TextTransformer,
{
    chunker: ParagraphChunker,
    dispatcher: Dispatcher<B>,
    tracker: Arc<ProgressTracker>,
    progress_retention: Duration,
}

impl<B: ?Sized> CleaningPipeline<B>
where
    B: TextTransformer + 'static,
{
    pub fn new(backend: Arc<B>, tracker: Arc<ProgressTracker>, options: PipelineOptions) -> Self {
        let client = Arc::new(TransformClient::new(backend, options.timeout));
        Self {
            chunker: ParagraphChunker::new(options.max_chunk_chars),
            dispatcher: Dispatcher::new(client, options.max_workers),
            tracker,
            progress_retention: options.progress_retention,
        }
    }

    /// Cleans `text` and marks the session completed.
    pub async fn run(&self, text: &str, session: SessionId) -> Result<String, PipelineError> {
        let cleaned = self.clean(text, session).await?;
        self.finish(session);
        Ok(cleaned)
    }

    /// Cleans `text` but leaves the session `Processing` at 100%, for callers
    /// that still have to deliver the result before calling [`finish`](Self::finish).
    /// Failures are recorded on the session before they are returned.
    #[tracing::instrument(skip(self, text), fields(session_id = %session, chars = text.len()))]
    pub async fn clean(&self, text: &str, session: SessionId) -> Result<String, PipelineError> {
        if text.trim().is_empty() {
            self.mark_failed(session, &PipelineError::EmptyInput);
            return Err(PipelineError::EmptyInput);
        }

        let chunks = self.chunker.split(text);
        let total = chunks.len();
        tracing::info!(total, "Document chunked");

        self.tracker.start(session, total);
        let sink = self.tracker.sink(session);

        match self.dispatcher.dispatch(chunks, Some(sink)).await {
            Ok(cleaned) => {
                tracing::info!(total, output_chars = cleaned.len(), "Chunks cleaned");
                Ok(cleaned)
            }
            Err(e) => {
                let error = PipelineError::from(e);
                self.mark_failed(session, &error);
                tracing::error!(error = %error, "Cleaning failed");
                Err(error)
            }
        }
    }

    /// Marks the session completed; it stays visible for the retention window.
    pub fn finish(&self, session: SessionId) {
        self.tracker.complete(session);
        self.tracker.expire(session, self.progress_retention);
        tracing::info!(session_id = %session, "Session completed");
    }

    /// Puts the session into a terminal failed state that stays visible for
    /// the retention window.
    pub fn mark_failed(&self, session: SessionId, reason: impl fmt::Display) {
        self.tracker.fail(session, reason.to_string());
        self.tracker.expire(session, self.progress_retention);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("no usable text to process")]
    EmptyInput,
    #[error("timeout: chunk {index} exceeded {after:?}")]
    Timeout { index: usize, after: Duration },
    #[error("upstream error on chunk {index}: {message}")]
    UpstreamError { index: usize, message: String },
}

impl From<TransformError> for PipelineError {
    fn from(error: TransformError) -> Self {
        match error {
            TransformError::Timeout { index, after } => PipelineError::Timeout { index, after },
            TransformError::Upstream { index, message } => {
                PipelineError::UpstreamError { index, message }
            }
        }
    }
}
