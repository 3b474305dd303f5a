use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::ai::common::{build_vision_chat_body, parse_chat_content, send_chat_request};
use crate::ai::config::AiConfig;
use crate::ai::prompts::VisionPrompt;
use crate::error::ProviderError;

/// A hosted model that turns an image prompt into free text.
///
/// The text is untrusted: callers must not assume it follows the requested
/// format.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &VisionPrompt) -> Result<String, ProviderError>;
}

/// Client for OpenAI-compatible chat-completions endpoints.
pub struct OpenAiVisionClient {
    http: reqwest::Client,
    config: AiConfig,
}

impl OpenAiVisionClient {
    pub fn new(config: AiConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| ProviderError::Unavailable(err.to_string()))?;
        Ok(Self { http, config })
    }
}

#[async_trait]
impl CompletionClient for OpenAiVisionClient {
    #[instrument(level = "debug", skip_all, fields(model = %self.config.vision_model))]
    async fn complete(&self, prompt: &VisionPrompt) -> Result<String, ProviderError> {
        let body = build_vision_chat_body(
            &self.config.vision_model,
            &prompt.system,
            &prompt.instruction,
            &prompt.image_data_url(),
            self.config.max_tokens,
        );

        debug!(url = %self.config.chat_url, image_bytes = prompt.image.len(), "sending vision completion request");

        let timeout_secs = self.config.timeout.as_secs();
        let builder = self.http.post(&self.config.chat_url).json(&body);
        let resp = send_chat_request(&self.config.api_key, builder, timeout_secs).await?;
        let raw = resp.text().await.map_err(|err| {
            if err.is_timeout() {
                ProviderError::Timeout(timeout_secs)
            } else {
                ProviderError::Unavailable(err.to_string())
            }
        })?;
        parse_chat_content(&raw)
    }
}

/// Offline stand-in enabled with `DRY_RUN=1`: always answers `answer_id:0.92`.
pub struct DryRunClient {
    answer_id: String,
}

impl DryRunClient {
    pub fn new(answer_id: impl Into<String>) -> Self {
        Self {
            answer_id: answer_id.into(),
        }
    }
}

#[async_trait]
impl CompletionClient for DryRunClient {
    async fn complete(&self, _prompt: &VisionPrompt) -> Result<String, ProviderError> {
        debug!(answer_id = %self.answer_id, "dry run completion");
        Ok(format!("{}:0.92", self.answer_id))
    }
}
