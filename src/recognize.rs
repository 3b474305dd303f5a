use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::ai::{build_prompt, CompletionClient};
use crate::catalog::Catalog;
use crate::decision::{decide, Outcome};
use crate::error::{ProviderError, RecognizeError};
use crate::parse::parse_detections;
use crate::types::{Lang, Persona};
use crate::validate::RecognitionRequest;

/// One detection as returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionView {
    pub name: String,
    pub id: String,
    pub confidence: f64,
}

/// The response body of a successful recognition.
#[derive(Debug, Clone, Serialize)]
pub struct RecognitionResult {
    pub lang: Lang,
    pub persona: Persona,
    pub latency_ms: u64,
    pub request_id: String,
    pub detections: Vec<DetectionView>,
    pub answer: String,
    #[serde(skip)]
    pub outcome: Outcome,
}

/// Runs a validated request through prompt, provider, parser and decision.
#[derive(Clone)]
pub struct Recognizer {
    catalog: Arc<Catalog>,
    client: Arc<dyn CompletionClient>,
    timeout: Duration,
}

impl Recognizer {
    pub fn new(catalog: Arc<Catalog>, client: Arc<dyn CompletionClient>, timeout: Duration) -> Self {
        Self {
            catalog,
            client,
            timeout,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Exactly one provider call per request. Failures are not retried.
    #[instrument(level = "debug", skip(self, request), fields(lang = request.lang.code()))]
    pub async fn recognize(
        &self,
        request: RecognitionRequest,
        request_id: String,
    ) -> Result<RecognitionResult, RecognizeError> {
        let prompt = build_prompt(&request, &self.catalog);

        let started = Instant::now();
        let raw = match tokio::time::timeout(self.timeout, self.client.complete(&prompt)).await {
            Ok(res) => res?,
            Err(_) => {
                warn!(request_id, timeout_secs = self.timeout.as_secs(), "completion timed out");
                return Err(ProviderError::Timeout(self.timeout.as_secs()).into());
            }
        };
        let detections = parse_detections(&raw, &self.catalog)?;
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let persona = request.persona.unwrap_or_default();
        let decision = decide(detections, &self.catalog, request.lang, persona);
        let detections = decision
            .detections
            .iter()
            .filter_map(|d| {
                let entry = self.catalog.get(&d.landmark_id)?;
                Some(DetectionView {
                    name: entry.name(request.lang).to_string(),
                    id: entry.id.clone(),
                    confidence: d.confidence,
                })
            })
            .collect();

        info!(request_id, outcome = ?decision.outcome, latency_ms, "recognition finished");
        Ok(RecognitionResult {
            lang: request.lang,
            persona,
            latency_ms,
            request_id,
            detections,
            answer: decision.answer,
            outcome: decision.outcome,
        })
    }
}
