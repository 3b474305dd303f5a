use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, trace, warn};

use crate::error::ProviderError;

pub const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<ChatContent>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChatContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Deserialize)]
struct ContentPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// Build a chat-completions body with one system and one user message.
pub fn build_vision_chat_body(
    model: &str,
    system: &str,
    instruction: &str,
    image_url: &str,
    max_tokens: u32,
) -> serde_json::Value {
    serde_json::json!({
        "model": model,
        "temperature": 0,
        "max_tokens": max_tokens,
        "messages": [
            { "role": "system", "content": system },
            {
                "role": "user",
                "content": [
                    { "type": "text", "text": instruction },
                    { "type": "image_url", "image_url": { "url": image_url } }
                ],
            }
        ]
    })
}

/// Send a prepared request and translate transport and status failures.
pub async fn send_chat_request(
    api_key: &str,
    builder: reqwest::RequestBuilder,
    timeout_secs: u64,
) -> Result<reqwest::Response, ProviderError> {
    let resp = builder
        .bearer_auth(api_key)
        .send()
        .await
        .map_err(|err| transport_error(err, timeout_secs))?;

    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let err_text = resp.text().await.unwrap_or_default();
    let snippet: String = err_text.chars().take(200).collect();
    warn!(%status, body = %snippet, "completion provider error");
    Err(status_error(status, snippet))
}

/// Classify a non-success HTTP status from the provider.
pub fn status_error(status: StatusCode, detail: String) -> ProviderError {
    let message = format!("{status}: {detail}");
    match status {
        StatusCode::BAD_REQUEST
        | StatusCode::PAYLOAD_TOO_LARGE
        | StatusCode::UNSUPPORTED_MEDIA_TYPE
        | StatusCode::UNPROCESSABLE_ENTITY => ProviderError::Rejected(message),
        _ => ProviderError::Unavailable(message),
    }
}

fn transport_error(err: reqwest::Error, timeout_secs: u64) -> ProviderError {
    if err.is_timeout() {
        warn!(error = %err, "completion request timed out");
        ProviderError::Timeout(timeout_secs)
    } else {
        warn!(error = %err, "completion request failed");
        ProviderError::Unavailable(err.to_string())
    }
}

/// Extract the assistant text from a chat-completions response body.
pub fn parse_chat_content(raw: &str) -> Result<String, ProviderError> {
    let snippet: String = raw.chars().take(200).collect();
    debug!(snippet = %snippet, "chat response body");
    trace!(raw = %raw, "chat response");

    let chat: ChatResponse = serde_json::from_str(raw)
        .map_err(|err| ProviderError::MalformedOutput(format!("invalid chat envelope: {err}")))?;
    let message = &chat
        .choices
        .first()
        .ok_or_else(|| ProviderError::MalformedOutput("missing chat choice".into()))?
        .message;

    let text = match &message.content {
        Some(ChatContent::Text(text)) => text.clone(),
        Some(ChatContent::Parts(parts)) => parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n"),
        None => String::new(),
    };
    Ok(text.trim().to_string())
}
