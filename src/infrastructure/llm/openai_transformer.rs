use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{TextTransformer, TransformerError};
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::config::LlmSettings;

pub const CLEANING_SYSTEM_PROMPT: &str = "You are a text cleaning assistant specialized in preparing text for text-to-speech applications.

Your tasks:
1. Fix broken line breaks and hyphenation (e.g., \"exam-\\nple\" becomes \"example\")
2. Remove page numbers, headers, footers, and irrelevant metadata
3. Fix spacing and punctuation issues
4. Remove special characters that don't contribute to meaning
5. Ensure proper sentence structure and paragraph breaks
6. Preserve the original meaning and content
7. Make the text flow naturally for spoken reading
8. Keep abbreviations that are commonly spoken (e.g., Dr., Mr., etc.)

Return ONLY the cleaned text, with no explanations or additional comments.";

const USER_PROMPT_LEAD: &str =
    "Please clean the following text extracted from a PDF so it can be used in a text-to-speech editor:";

/// Chat-completions backend speaking the OpenAI wire format.
pub struct OpenAiTransformer {
    client: Client,
    provider: String,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Serialize, Deserialize, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiTransformer {
    pub fn from_settings(settings: &LlmSettings) -> Result<Self, TransformerError> {
        let base_url = match settings.provider.as_str() {
            "openai" => settings
                .base_url
                .clone()
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string())
                .trim_end_matches('/')
                .to_string(),
            "lmstudio" => settings
                .base_url
                .clone()
                .ok_or_else(|| {
                    TransformerError::InvalidResponse(
                        "base_url required for lmstudio provider".to_string(),
                    )
                })?
                .trim_end_matches('/')
                .to_string(),
            "azure" => {
                let endpoint = settings.azure_endpoint.as_ref().ok_or_else(|| {
                    TransformerError::InvalidResponse(
                        "azure_endpoint required for azure provider".to_string(),
                    )
                })?;
                format!(
                    "{}/openai/deployments/{}",
                    endpoint.trim_end_matches('/'),
                    settings.model
                )
            }
            other => {
                return Err(TransformerError::InvalidResponse(format!(
                    "unknown provider: {}",
                    other
                )));
            }
        };

        Ok(Self {
            client: Client::new(),
            provider: settings.provider.clone(),
            base_url,
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        })
    }

    fn build_messages(text: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage {
                role: "system".to_string(),
                content: CLEANING_SYSTEM_PROMPT.to_string(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: format!("{}\n\n{}", USER_PROMPT_LEAD, text),
            },
        ]
    }

    /// First choice's text. A present but empty string is a valid rewrite; a
    /// missing or null `content` is not.
    fn rewritten_text(completion: ChatCompletionResponse) -> Result<String, TransformerError> {
        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| TransformerError::InvalidResponse("empty choices".to_string()))?;

        choice
            .message
            .content
            .map(|content| content.trim().to_string())
            .ok_or_else(|| TransformerError::InvalidResponse("missing content".to_string()))
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.provider == "azure" {
            request.header("api-key", &self.api_key)
        } else {
            request.header("Authorization", format!("Bearer {}", self.api_key))
        }
    }
}

#[async_trait]
impl TextTransformer for OpenAiTransformer {
    async fn rewrite(&self, text: &str) -> Result<String, TransformerError> {
        tracing::debug!(preview = %sanitize_prompt(text), model = %self.model, "Requesting rewrite");

        let request_body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: Self::build_messages(text),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&request_body);
        let response = self
            .apply_auth(request)
            .send()
            .await
            .map_err(|e| TransformerError::ApiRequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TransformerError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TransformerError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| TransformerError::InvalidResponse(e.to_string()))?;

        Self::rewritten_text(completion)
    }
}
