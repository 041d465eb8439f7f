use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::Instrument;

use crate::application::ports::{
    DocumentRenderer, FileLoader, FileLoaderError, RenderError, TextTransformer,
};
use crate::domain::{Document, SessionId};

use super::cleaning_pipeline::{CleaningPipeline, PipelineError};
use super::output_registry::OutputRegistry;

pub struct CleaningMessage {
    pub session: SessionId,
    pub document: Document,
    pub data: Vec<u8>,
}

/// Runs queued cleaning jobs: extract, clean, render.
pub struct CleaningWorker<B: ?Sized>
where
    B: TextTransformer,
{
    file_loader: Arc<dyn FileLoader>,
    pipeline: Arc<CleaningPipeline<B>>,
    renderer: Arc<dyn DocumentRenderer>,
    outputs: Arc<OutputRegistry>,
}

impl<B: ?Sized> CleaningWorker<B>
where
    B: TextTransformer + 'static,
{
    pub fn new(
        file_loader: Arc<dyn FileLoader>,
        pipeline: Arc<CleaningPipeline<B>>,
        renderer: Arc<dyn DocumentRenderer>,
        outputs: Arc<OutputRegistry>,
    ) -> Self {
        Self {
            file_loader,
            pipeline,
            renderer,
            outputs,
        }
    }

    /// Consumes messages until every sender is dropped. Each job runs on its
    /// own task so a long document does not hold up the queue.
    pub async fn run(self: Arc<Self>, mut receiver: mpsc::Receiver<CleaningMessage>) {
        tracing::info!("Cleaning worker started");
        while let Some(msg) = receiver.recv().await {
            let worker = Arc::clone(&self);
            let span = tracing::info_span!(
                "cleaning_job",
                session_id = %msg.session,
                filename = %msg.document.filename,
            );
            tokio::spawn(
                async move {
                    if let Err(e) = worker.process_job(msg).await {
                        tracing::error!(error = %e, "Cleaning job failed");
                    }
                }
                .instrument(span),
            );
        }
        tracing::info!("Cleaning worker stopped: channel closed");
    }

    /// Extracts, cleans and renders one upload. The session only turns
    /// `Completed` once its output is registered for download.
    pub async fn process_job(&self, msg: CleaningMessage) -> Result<PathBuf, CleaningWorkerError> {
        let session = msg.session;
        tracing::info!(
            session_id = %session,
            content_type = msg.document.content_type.as_mime(),
            size_bytes = msg.document.size_bytes,
            "Processing document"
        );

        let text = match self.file_loader.extract_text(&msg.data, &msg.document).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(session_id = %session, error = %e, "Text extraction failed");
                self.pipeline.mark_failed(session, &PipelineError::EmptyInput);
                return Err(CleaningWorkerError::Extraction(e));
            }
        };

        let cleaned = self.pipeline.clean(&text, session).await?;

        let path = self.outputs.output_path(
            session,
            &msg.document.output_filename(self.renderer.format()),
        );

        if let Err(e) = self.renderer.render(&cleaned, &path).await {
            self.pipeline.mark_failed(session, format!("render: {}", e));
            self.outputs.discard(session).await;
            return Err(CleaningWorkerError::Render(e));
        }

        self.outputs.insert(session, path.clone());
        self.pipeline.finish(session);
        tracing::info!(session_id = %session, path = %path.display(), "Cleaned document rendered");

        Ok(path)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CleaningWorkerError {
    #[error("text extraction: {0}")]
    Extraction(FileLoaderError),
    #[error("pipeline: {0}")]
    Pipeline(#[from] PipelineError),
    #[error("render: {0}")]
    Render(RenderError),
}
