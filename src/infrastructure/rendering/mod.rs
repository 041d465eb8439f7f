mod pdf_renderer;
mod plain_text_renderer;
mod staged_write;

pub use pdf_renderer::PdfRenderer;
pub use plain_text_renderer::PlainTextRenderer;

use std::sync::Arc;

use crate::application::ports::DocumentRenderer;
use crate::domain::OutputFormat;

/// Renderer for the configured output format.
pub fn renderer_for(format: OutputFormat) -> Arc<dyn DocumentRenderer> {
    match format {
        OutputFormat::Pdf => Arc::new(PdfRenderer::new()),
        OutputFormat::Text => Arc::new(PlainTextRenderer::new()),
    }
}

/// Trimmed, non-empty paragraphs of cleaned text.
fn paragraphs(text: &str) -> impl Iterator<Item = &str> {
    text.split("\n\n").map(str::trim).filter(|p| !p.is_empty())
}
