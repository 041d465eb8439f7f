use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;

use crate::application::ports::{ProgressSink, TextTransformer};
use crate::domain::{Chunk, TransformResult};

use super::chunker::PARAGRAPH_SEPARATOR;
use super::transform_client::{TransformClient, TransformError};

/// Fans chunks out to a bounded pool of transform workers and fans the
/// results back in by chunk index.
pub struct Dispatcher<B: ?Sized>
where
    B: TextTransformer,
{
    client: Arc<TransformClient<B>>,
    max_workers: usize,
}

impl<B: ?Sized> Dispatcher<B>
where
    B: TextTransformer + 'static,
{
    pub fn new(client: Arc<TransformClient<B>>, max_workers: usize) -> Self {
        Self {
            client,
            max_workers: max_workers.max(1),
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Transforms every chunk and joins the non-empty results in input order.
    ///
    /// Fails with the first chunk error observed. Queued chunks are never
    /// started after that; in-flight ones run to completion but their results
    /// and progress are dropped.
    pub async fn dispatch(
        &self,
        chunks: Vec<Chunk>,
        sink: Option<Arc<dyn ProgressSink>>,
    ) -> Result<String, TransformError> {
        let total = chunks.len();
        if total == 0 {
            return Ok(String::new());
        }

        tracing::info!(
            total,
            max_workers = self.max_workers,
            timeout = ?self.client.timeout(),
            "Dispatching chunks"
        );

        let semaphore = Arc::new(Semaphore::new(self.max_workers));
        let completed = Arc::new(Mutex::new(0usize));
        let mut slots: Vec<Option<String>> = vec![None; total];
        let mut task_chunks = HashMap::with_capacity(total);
        let mut join_set: JoinSet<Option<(usize, Result<TransformResult, TransformError>)>> =
            JoinSet::new();

        // Slots are addressed by position in `chunks`; `Chunk::index` is only
        // carried through for error reporting.
        for (slot, chunk) in chunks.into_iter().enumerate() {
            let index = chunk.index;
            let client = Arc::clone(&self.client);
            let semaphore = Arc::clone(&semaphore);
            let completed = Arc::clone(&completed);
            let sink = sink.clone();

            let handle = join_set.spawn(async move {
                // A closed semaphore means the job already failed.
                let _permit = semaphore.clone().acquire_owned().await.ok()?;

                let result = client.transform(&chunk).await;

                match &result {
                    Ok(_) => {
                        let mut done = completed.lock().await;
                        if !semaphore.is_closed() {
                            *done += 1;
                            if let Some(sink) = &sink {
                                sink.on_progress(*done, total);
                            }
                        }
                    }
                    // Closed while this task still holds its permit, so no
                    // waiting chunk can pick it up.
                    Err(_) => semaphore.close(),
                }

                Some((slot, result))
            });
            task_chunks.insert(handle.id(), index);
        }

        while let Some(joined) = join_set.join_next().await {
            let error = match joined {
                Ok(Some((slot, Ok(result)))) => {
                    tracing::debug!(chunk_index = result.index, "Chunk transformed");
                    slots[slot] = result.content;
                    continue;
                }
                Ok(Some((_, Err(e)))) => e,
                Ok(None) => continue,
                Err(e) => TransformError::Upstream {
                    index: task_chunks.get(&e.id()).copied().unwrap_or_default(),
                    message: format!("worker task failed: {}", e),
                },
            };

            semaphore.close();
            join_set.detach_all();
            tracing::warn!(
                chunk_index = error.chunk_index(),
                timed_out = matches!(error, TransformError::Timeout { .. }),
                error = %error,
                "Chunk failed, aborting dispatch"
            );
            return Err(error);
        }

        Ok(reassemble(slots))
    }
}

/// Joins the slots in order with a paragraph separator, skipping missing and
/// whitespace-only ones. Kept slots are copied verbatim.
pub fn reassemble(slots: Vec<Option<String>>) -> String {
    slots
        .into_iter()
        .flatten()
        .filter(|content| !content.trim().is_empty())
        .collect::<Vec<_>>()
        .join(PARAGRAPH_SEPARATOR)
}
