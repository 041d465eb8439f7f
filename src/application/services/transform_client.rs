use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::TextTransformer;
use crate::domain::{Chunk, TransformResult};

/// Runs one backend rewrite per chunk under a hard deadline.
pub struct TransformClient<B: ?Sized>
where
    B: TextTransformer,
{
    backend: Arc<B>,
    timeout: Duration,
}

impl<B: ?Sized> TransformClient<B>
where
    B: TextTransformer,
{
    pub fn new(backend: Arc<B>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Rewrites `chunk.content`. On timeout the backend future is dropped, so a
    /// late response can never be observed by the caller.
    pub async fn transform(&self, chunk: &Chunk) -> Result<TransformResult, TransformError> {
        tracing::debug!(chunk_index = chunk.index, size = chunk.size, "Transforming chunk");

        let outcome = tokio::time::timeout(self.timeout, self.backend.rewrite(&chunk.content))
            .await
            .map_err(|_| TransformError::Timeout {
                index: chunk.index,
                after: self.timeout,
            })?;

        match outcome {
            Ok(content) => Ok(TransformResult::success(chunk.index, content)),
            Err(e) => Err(TransformError::Upstream {
                index: chunk.index,
                message: e.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    #[error("chunk {index} timed out after {after:?}")]
    Timeout { index: usize, after: Duration },
    #[error("chunk {index} upstream error: {message}")]
    Upstream { index: usize, message: String },
}

impl TransformError {
    pub fn chunk_index(&self) -> usize {
        match self {
            TransformError::Timeout { index, .. } | TransformError::Upstream { index, .. } => {
                *index
            }
        }
    }
}
