/// An ordered, bounded-size segment of a document's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub content: String,
    /// Character count of `content`.
    pub size: usize,
}

impl Chunk {
    pub fn new(index: usize, content: String) -> Self {
        let size = content.chars().count();
        Self {
            index,
            content,
            size,
        }
    }
}

/// Outcome of rewriting one chunk, addressed by the source chunk's index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformResult {
    pub index: usize,
    pub content: Option<String>,
}

impl TransformResult {
    pub fn success(index: usize, content: String) -> Self {
        Self {
            index,
            content: Some(content),
        }
    }
}
