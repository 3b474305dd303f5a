use tracing::debug;

use crate::catalog::Catalog;
use crate::messages;
use crate::types::{Detection, Lang, Persona};

/// Confidence at or above which a landmark counts as recognized.
pub const RECOGNIZED_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Recognized,
    LowConfidence,
    NotRecognized,
}

/// Classify the top confidence. Missing, zero or negative means no match.
pub fn classify(top: Option<f64>) -> Outcome {
    match top {
        Some(c) if c >= RECOGNIZED_THRESHOLD => Outcome::Recognized,
        Some(c) if c > 0.0 => Outcome::LowConfidence,
        _ => Outcome::NotRecognized,
    }
}

#[derive(Debug, Clone)]
pub struct Decision {
    pub outcome: Outcome,
    pub detections: Vec<Detection>,
    pub answer: String,
}

/// Apply the thresholds to ranked detections and render the answer.
///
/// Detections that did not clear 0.0 are dropped; the rest keep their
/// confidence and order.
pub fn decide(detections: Vec<Detection>, catalog: &Catalog, lang: Lang, persona: Persona) -> Decision {
    let detections: Vec<Detection> = detections
        .into_iter()
        .filter(|d| d.confidence > 0.0 && catalog.get(&d.landmark_id).is_some())
        .collect();
    let top = detections.first();
    let outcome = classify(top.map(|d| d.confidence));

    let answer = match (outcome, top.and_then(|d| catalog.get(&d.landmark_id))) {
        (Outcome::Recognized, Some(entry)) => messages::recognized(lang, persona, entry.name(lang)),
        (Outcome::LowConfidence, _) => messages::low_confidence(lang, persona).to_string(),
        _ => messages::not_recognized(lang, persona).to_string(),
    };
    debug!(?outcome, kept = detections.len(), "decision made");

    Decision {
        outcome,
        detections,
        answer,
    }
}
