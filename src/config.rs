use std::env;

use anyhow::{Context, Result};

use crate::ai::config::env_or;
use crate::ai::AiConfig;
use crate::validate::DEFAULT_MAX_UPLOAD_BYTES;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: String,
    pub landmarks_json: String,
    pub max_upload_bytes: usize,
    pub dry_run: bool,
    pub ai: Option<AiConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let landmarks_json =
            env::var("LANDMARKS_JSON").context("LANDMARKS_JSON env var is not set")?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let max_upload_bytes = env_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES);
        let dry_run = env::var("DRY_RUN").map(|v| v.trim() == "1").unwrap_or(false);
        let ai = AiConfig::from_env();
        Ok(Self {
            bind_addr,
            landmarks_json,
            max_upload_bytes,
            dry_run,
            ai,
        })
    }
}
