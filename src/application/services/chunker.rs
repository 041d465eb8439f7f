use crate::domain::Chunk;

pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Splits document text into chunks of at most `max_chunk_chars` characters,
/// preferring paragraph boundaries.
#[derive(Debug, Clone, Copy)]
pub struct ParagraphChunker {
    max_chunk_chars: usize,
}

impl ParagraphChunker {
    pub fn new(max_chunk_chars: usize) -> Self {
        Self {
            max_chunk_chars: max_chunk_chars.max(1),
        }
    }

    pub fn max_chunk_chars(&self) -> usize {
        self.max_chunk_chars
    }

    pub fn split(&self, text: &str) -> Vec<Chunk> {
        chunk_text(text, self.max_chunk_chars)
    }
}

/// Greedily packs trimmed paragraphs into chunks. A paragraph that cannot fit
/// in any chunk on its own is hard-split into fixed-size character slices.
pub fn chunk_text(text: &str, max_chunk_chars: usize) -> Vec<Chunk> {
    let max_chunk_chars = max_chunk_chars.max(1);
    let separator_len = PARAGRAPH_SEPARATOR.chars().count();

    let mut contents: Vec<String> = Vec::new();
    let mut buffer = String::new();
    let mut buffer_len = 0;

    for paragraph in text
        .split(PARAGRAPH_SEPARATOR)
        .map(str::trim)
        .filter(|p| !p.is_empty())
    {
        let paragraph_len = paragraph.chars().count();

        if paragraph_len > max_chunk_chars {
            if !buffer.is_empty() {
                contents.push(std::mem::take(&mut buffer));
                buffer_len = 0;
            }
            contents.extend(hard_split(paragraph, max_chunk_chars));
            continue;
        }

        let projected = if buffer.is_empty() {
            paragraph_len
        } else {
            buffer_len + separator_len + paragraph_len
        };

        if projected > max_chunk_chars {
            contents.push(std::mem::take(&mut buffer));
            buffer_len = 0;
        }

        if !buffer.is_empty() {
            buffer.push_str(PARAGRAPH_SEPARATOR);
            buffer_len += separator_len;
        }
        buffer.push_str(paragraph);
        buffer_len += paragraph_len;
    }

    if !buffer.is_empty() {
        contents.push(buffer);
    }

    contents
        .into_iter()
        .enumerate()
        .map(|(index, content)| Chunk::new(index, content))
        .collect()
}

fn hard_split(paragraph: &str, max_chunk_chars: usize) -> Vec<String> {
    let chars: Vec<char> = paragraph.chars().collect();
    chars
        .chunks(max_chunk_chars)
        .map(|slice| slice.iter().collect())
        .collect()
}
