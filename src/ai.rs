//! Everything that talks to the hosted vision model.

pub mod common;
pub mod config;
pub mod prompts;
pub mod vision;

pub use config::AiConfig;
pub use prompts::{build_prompt, VisionPrompt};
pub use vision::{CompletionClient, DryRunClient, OpenAiVisionClient};
