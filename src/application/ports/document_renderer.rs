use std::path::Path;

use async_trait::async_trait;

use crate::domain::OutputFormat;

/// Sink for cleaned, paragraph-separated text.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    /// Format written by [`render`](Self::render); decides the output file name.
    fn format(&self) -> OutputFormat;

    async fn render(&self, text: &str, path: &Path) -> Result<(), RenderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("nothing to render")]
    EmptyDocument,
    #[error("layout failed: {0}")]
    LayoutFailed(String),
    #[error("write failed: {0}")]
    WriteFailed(String),
}
