use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use pdf_oxide::PdfDocument;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{ContentType, Document};

use super::text_sanitizer::sanitize_extracted_text;

const READ_DEADLINE: Duration = Duration::from_secs(30);

/// Text of one PDF page, numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PageText {
    number: usize,
    text: String,
}

/// Reads uploaded PDFs. Each page with readable text becomes one paragraph
/// of the extracted document.
#[derive(Default)]
pub struct PdfAdapter;

impl PdfAdapter {
    pub fn new() -> Self {
        Self
    }

    /// `pdf_oxide` opens from a path, so the upload is spooled to a named
    /// temp file that lives until the read finishes.
    fn read_pages(data: Vec<u8>) -> Result<Vec<PageText>, FileLoaderError> {
        let mut spool = tempfile::Builder::new()
            .prefix("narrato-")
            .suffix(".pdf")
            .tempfile()
            .map_err(|e| FileLoaderError::ExtractionFailed(format!("cannot spool upload: {e}")))?;
        spool
            .write_all(&data)
            .map_err(|e| FileLoaderError::ExtractionFailed(format!("cannot spool upload: {e}")))?;

        let mut pdf = PdfDocument::open(spool.path())
            .map_err(|e| FileLoaderError::ExtractionFailed(format!("not a readable PDF: {e}")))?;
        let page_count = pdf
            .page_count()
            .map_err(|e| FileLoaderError::ExtractionFailed(format!("no page tree: {e}")))?;

        let mut pages = Vec::with_capacity(page_count);
        for number in 1..=page_count {
            match pdf.extract_text(number - 1) {
                Ok(text) => {
                    tracing::debug!(page = number, chars = text.len(), "Page read");
                    pages.push(PageText { number, text });
                }
                Err(e) => tracing::warn!(page = number, error = %e, "Skipping unreadable page"),
            }
        }
        Ok(pages)
    }
}

/// Sanitizes every page and joins the non-blank ones as paragraphs.
fn join_pages(pages: Vec<PageText>) -> Option<String> {
    let paragraphs: Vec<String> = pages
        .into_iter()
        .filter_map(|page| {
            let text = sanitize_extracted_text(&page.text);
            if text.is_empty() {
                tracing::debug!(page = page.number, "Page has no text");
                None
            } else {
                Some(text)
            }
        })
        .collect();

    (!paragraphs.is_empty()).then(|| paragraphs.join("\n\n"))
}

#[async_trait]
impl FileLoader for PdfAdapter {
    #[tracing::instrument(skip(self, data), fields(filename = %document.filename, bytes = data.len()))]
    async fn extract_text(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<String, FileLoaderError> {
        if document.content_type != ContentType::Pdf {
            return Err(FileLoaderError::UnsupportedContentType(
                document.content_type.as_mime().to_string(),
            ));
        }
        if data.is_empty() {
            return Err(FileLoaderError::NoTextFound(document.filename.clone()));
        }

        let upload = data.to_vec();
        let pages = match tokio::time::timeout(
            READ_DEADLINE,
            tokio::task::spawn_blocking(move || Self::read_pages(upload)),
        )
        .await
        {
            Ok(Ok(pages)) => pages?,
            Ok(Err(e)) => {
                return Err(FileLoaderError::ExtractionFailed(format!(
                    "PDF reader panicked: {e}"
                )));
            }
            Err(_) => {
                return Err(FileLoaderError::ExtractionFailed(format!(
                    "PDF not read within {}s",
                    READ_DEADLINE.as_secs()
                )));
            }
        };

        let page_count = pages.len();
        let text = join_pages(pages)
            .ok_or_else(|| FileLoaderError::NoTextFound(document.filename.clone()))?;

        tracing::info!(page_count, chars = text.len(), "PDF text extracted");
        Ok(text)
    }
}
