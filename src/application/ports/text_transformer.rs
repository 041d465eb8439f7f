use async_trait::async_trait;

/// External rewriting capability, invoked once per chunk.
#[async_trait]
pub trait TextTransformer: Send + Sync {
    async fn rewrite(&self, text: &str) -> Result<String, TransformerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransformerError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
