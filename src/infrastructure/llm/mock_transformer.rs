use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{TextTransformer, TransformerError};

/// Offline backend that returns its input with whitespace collapsed inside
/// each paragraph.
#[derive(Debug, Default, Clone)]
pub struct MockTextTransformer {
    delay: Duration,
}

impl MockTextTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl TextTransformer for MockTextTransformer {
    async fn rewrite(&self, text: &str) -> Result<String, TransformerError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(text
            .split("\n\n")
            .map(|p| p.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n"))
    }
}
