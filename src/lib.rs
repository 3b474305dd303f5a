use std::sync::Arc;

use anyhow::{bail, Context, Result};

pub mod ai;
pub mod api;
pub mod catalog;
pub mod config;
pub mod decision;
pub mod error;
pub mod messages;
pub mod parse;
pub mod recognize;
pub mod system_info;
pub mod types;
pub mod validate;

pub use api::{router, AppState};
pub use catalog::{Catalog, LandmarkEntry};
pub use config::Config;
pub use decision::{classify, Outcome, RECOGNIZED_THRESHOLD};
pub use error::{CatalogError, ProviderError, RecognizeError};
pub use parse::parse_detections;
pub use recognize::{RecognitionResult, Recognizer};
pub use system_info::get_system_info;
pub use types::{Detection, ImageMime, Lang, Persona};

use crate::ai::{CompletionClient, DryRunClient, OpenAiVisionClient};

// ──────────────────────────────────────────────────────────────
// Application setup
// ──────────────────────────────────────────────────────────────

/// Pick the completion provider for this process.
pub fn build_client(config: &Config, catalog: &Catalog) -> Result<Arc<dyn CompletionClient>> {
    if config.dry_run {
        let first = catalog
            .entries()
            .first()
            .map(|e| e.id.clone())
            .unwrap_or_default();
        tracing::warn!(answer_id = %first, "DRY_RUN enabled, provider calls are simulated");
        return Ok(Arc::new(DryRunClient::new(first)));
    }
    let Some(ai) = config.ai.clone() else {
        bail!("VISION_API_KEY env var is not set");
    };
    tracing::info!(model = %ai.vision_model, url = %ai.chat_url, "using vision provider");
    Ok(Arc::new(OpenAiVisionClient::new(ai)?))
}

pub async fn run() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting landmark guide: {}", get_system_info());

    let config = Config::from_env()?;

    // --- Catalog ---
    // A broken catalog must stop the process before it serves traffic.
    let catalog = Catalog::from_json(&config.landmarks_json)
        .map_err(RecognizeError::from)
        .context("failed to load LANDMARKS_JSON")?;
    tracing::info!(landmarks = catalog.len(), "catalog loaded");
    let catalog = Arc::new(catalog);

    // --- Provider ---
    let client = build_client(&config, &catalog)?;
    let timeout = config
        .ai
        .as_ref()
        .map(|ai| ai.timeout)
        .unwrap_or(std::time::Duration::from_secs(ai::config::DEFAULT_TIMEOUT_SECS));
    let recognizer = Recognizer::new(catalog, client, timeout);

    // --- HTTP ---
    let app = router(AppState {
        recognizer,
        max_upload_bytes: config.max_upload_bytes,
    });
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}
