use std::path::Path;

use async_trait::async_trait;

use crate::application::ports::{DocumentRenderer, RenderError};
use crate::domain::OutputFormat;

use super::paragraphs;
use super::staged_write::write_staged;

/// Writes cleaned text as a UTF-8 text file, one blank line between paragraphs.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextRenderer;

impl PlainTextRenderer {
    pub fn new() -> Self {
        Self
    }

    fn layout(text: &str) -> String {
        let mut body = paragraphs(text).collect::<Vec<_>>().join("\n\n");
        if !body.is_empty() {
            body.push('\n');
        }
        body
    }
}

#[async_trait]
impl DocumentRenderer for PlainTextRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Text
    }

    #[tracing::instrument(skip(self, text), fields(path = %path.display()))]
    async fn render(&self, text: &str, path: &Path) -> Result<(), RenderError> {
        let body = Self::layout(text);
        if body.is_empty() {
            return Err(RenderError::EmptyDocument);
        }

        write_staged(path, body.as_bytes()).await?;

        tracing::debug!(bytes = body.len(), "Text document rendered");
        Ok(())
    }
}
