use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;
use crate::application::services::PipelineOptions;
use crate::domain::OutputFormat;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub llm: LlmSettings,
    pub pipeline: PipelineSettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    /// `openai`, `azure`, `lmstudio` or `mock`.
    pub provider: String,
    pub api_key: String,
    pub base_url: Option<String>,
    pub azure_endpoint: Option<String>,
    pub model: String,
    pub max_tokens: usize,
    pub temperature: f32,
    #[serde(default)]
    pub mock_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    pub max_chunk_chars: usize,
    pub timeout_seconds: u64,
    pub max_workers: usize,
    pub progress_retention_seconds: u64,
    pub reaper_interval_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub output_dir: PathBuf,
    /// `pdf` or `txt`.
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Settings {
    /// Layers built-in defaults, `appsettings.{environment}` and `APP_*`
    /// variables (`APP_PIPELINE__MAX_WORKERS=8`), in that order.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        let openai_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();

        let settings: Settings = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000_i64)?
            .set_default("server.max_upload_bytes", 16_i64 * 1024 * 1024)?
            .set_default("llm.provider", "openai")?
            .set_default("llm.api_key", openai_key)?
            .set_default("llm.model", "gpt-4o-mini")?
            .set_default("llm.max_tokens", 4000_i64)?
            .set_default("llm.temperature", 0.3)?
            .set_default("llm.mock_delay_ms", 0_i64)?
            .set_default("pipeline.max_chunk_chars", 6000_i64)?
            .set_default("pipeline.timeout_seconds", 120_i64)?
            .set_default("pipeline.max_workers", 4_i64)?
            .set_default("pipeline.progress_retention_seconds", 300_i64)?
            .set_default("pipeline.reaper_interval_seconds", 60_i64)?
            .set_default("storage.output_dir", "uploads")?
            .set_default("storage.output_format", "pdf")?
            .set_default("logging.level", "info")?
            .set_default("logging.enable_json", false)?
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str())).required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let pipeline = &self.pipeline;
        if pipeline.max_chunk_chars == 0 {
            return Err(ConfigError::Message(
                "pipeline.max_chunk_chars must be positive".to_string(),
            ));
        }
        if pipeline.max_workers == 0 {
            return Err(ConfigError::Message(
                "pipeline.max_workers must be positive".to_string(),
            ));
        }
        if pipeline.timeout_seconds == 0 {
            return Err(ConfigError::Message(
                "pipeline.timeout_seconds must be positive".to_string(),
            ));
        }
        if self.llm.provider != "mock" && self.llm.api_key.is_empty() {
            tracing::warn!(provider = %self.llm.provider, "No API key configured for LLM provider");
        }
        Ok(())
    }
}

impl PipelineSettings {
    pub fn options(&self) -> PipelineOptions {
        PipelineOptions {
            max_chunk_chars: self.max_chunk_chars,
            timeout: Duration::from_secs(self.timeout_seconds),
            max_workers: self.max_workers,
            progress_retention: Duration::from_secs(self.progress_retention_seconds),
        }
    }

    pub fn reaper_interval(&self) -> Duration {
        Duration::from_secs(self.reaper_interval_seconds.max(1))
    }
}
