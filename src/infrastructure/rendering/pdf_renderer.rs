use std::path::Path;

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{Object, Stream, dictionary};

use crate::application::ports::{DocumentRenderer, RenderError};
use crate::domain::OutputFormat;

use super::paragraphs;
use super::staged_write::write_staged;

// US Letter, in points.
const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const MARGIN_SIDE: i64 = 72;
const MARGIN_TOP: i64 = 72;
const MARGIN_BOTTOM: i64 = 18;

const FONT_SIZE: i64 = 12;
const LEADING: i64 = 16;
const PARAGRAPH_SPACING: i64 = 12;

/// Helvetica averages about half an em per glyph; 468pt of text width at
/// 12pt leaves room for roughly 78 characters.
const MAX_LINE_CHARS: usize = 76;

/// One laid-out line of body text.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PdfLine {
    text: String,
    starts_paragraph: bool,
}

/// Renders cleaned text as a paginated PDF, one paragraph per blank-line
/// separated block, in the built-in Helvetica font.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfRenderer;

impl PdfRenderer {
    pub fn new() -> Self {
        Self
    }

    fn layout(text: &str) -> Vec<Vec<PdfLine>> {
        let usable_height = PAGE_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let mut pages: Vec<Vec<PdfLine>> = Vec::new();
        let mut page: Vec<PdfLine> = Vec::new();
        let mut used = 0;

        for paragraph in paragraphs(text) {
            for (i, line) in wrap(paragraph, MAX_LINE_CHARS).into_iter().enumerate() {
                let starts_paragraph = i == 0 && !page.is_empty();
                let height = LEADING + if starts_paragraph { PARAGRAPH_SPACING } else { 0 };

                if used + height > usable_height {
                    pages.push(std::mem::take(&mut page));
                    used = 0;
                    page.push(PdfLine {
                        text: line,
                        starts_paragraph: false,
                    });
                    used += LEADING;
                    continue;
                }

                page.push(PdfLine {
                    text: line,
                    starts_paragraph,
                });
                used += height;
            }
        }

        if !page.is_empty() {
            pages.push(page);
        }
        pages
    }

    fn page_content(lines: &[PdfLine]) -> Result<Vec<u8>, RenderError> {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]),
            Operation::new("TL", vec![LEADING.into()]),
            Operation::new(
                "Td",
                vec![MARGIN_SIDE.into(), (PAGE_HEIGHT - MARGIN_TOP - FONT_SIZE).into()],
            ),
        ];

        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                operations.push(Operation::new("T*", vec![]));
            }
            if line.starts_paragraph {
                operations.push(Operation::new(
                    "Td",
                    vec![0.into(), (-PARAGRAPH_SPACING).into()],
                ));
            }
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(to_win_ansi(&line.text))],
            ));
        }
        operations.push(Operation::new("ET", vec![]));

        Content { operations }
            .encode()
            .map_err(|e| RenderError::LayoutFailed(e.to_string()))
    }

    fn build(pages: &[Vec<PdfLine>]) -> Result<Vec<u8>, RenderError> {
        let mut doc = lopdf::Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
        for lines in pages {
            let content_id = doc.add_object(Stream::new(dictionary! {}, Self::page_content(lines)?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| RenderError::LayoutFailed(e.to_string()))?;
        Ok(bytes)
    }
}

#[async_trait]
impl DocumentRenderer for PdfRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Pdf
    }

    #[tracing::instrument(skip(self, text), fields(path = %path.display()))]
    async fn render(&self, text: &str, path: &Path) -> Result<(), RenderError> {
        let pages = Self::layout(text);
        if pages.is_empty() {
            return Err(RenderError::EmptyDocument);
        }

        let bytes = Self::build(&pages)?;
        write_staged(path, &bytes).await?;

        tracing::debug!(pages = pages.len(), bytes = bytes.len(), "PDF document rendered");
        Ok(())
    }
}

/// Greedy word wrap by character count. Words longer than a line are broken.
fn wrap(paragraph: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_chars = 0;

    for word in paragraph.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > max_chars {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                line_chars = 0;
            }
            lines.push(word.drain(..max_chars).collect());
        }

        if word.is_empty() {
            continue;
        }
        if line_chars > 0 && line_chars + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut line));
            line_chars = 0;
        }
        if line_chars > 0 {
            line.push(' ');
            line_chars += 1;
        }
        line.extend(word.iter());
        line_chars += word.len();
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Encodes text for a `WinAnsiEncoding` font; unmappable characters become `?`.
fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            c if (c as u32) < 0x80 || ((c as u32) >= 0xA0 && (c as u32) <= 0xFF) => c as u8,
            _ => b'?',
        })
        .collect()
}
