use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::ai::common::OPENAI_CHAT_URL;

pub const DEFAULT_VISION_MODEL: &str = "gpt-4o";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_MAX_TOKENS: u32 = 150;

#[derive(Clone, Debug)]
pub struct AiConfig {
    pub api_key: String,
    pub vision_model: String,
    pub chat_url: String,
    pub timeout: Duration,
    pub max_tokens: u32,
}

impl AiConfig {
    /// Returns `None` when `VISION_API_KEY` is not set.
    pub fn from_env() -> Option<Self> {
        let api_key = match env::var("VISION_API_KEY") {
            Ok(k) if !k.trim().is_empty() => k,
            _ => return None,
        };
        Some(Self {
            api_key,
            vision_model: env::var("VISION_MODEL")
                .unwrap_or_else(|_| DEFAULT_VISION_MODEL.to_string()),
            chat_url: env::var("VISION_CHAT_URL").unwrap_or_else(|_| OPENAI_CHAT_URL.to_string()),
            timeout: Duration::from_secs(env_or("VISION_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)),
            max_tokens: env_or("VISION_MAX_TOKENS", DEFAULT_MAX_TOKENS),
        })
    }
}

/// Read a numeric variable, keeping `default` when it is missing or invalid.
pub fn env_or<T: FromStr + Copy + std::fmt::Display>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(name, value = %raw, %default, "invalid numeric setting, using default");
            default
        }),
        Err(_) => default,
    }
}
