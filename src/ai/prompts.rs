//! Prompt construction for the landmark classifier.
//!
//! Keeping the instruction text here makes it easy to tweak how the model is
//! asked to answer without touching the parser.

use bytes::Bytes;

use crate::catalog::Catalog;
use crate::types::ImageMime;
use crate::validate::RecognitionRequest;

/// System prompt restricting the model to the candidate ids.
pub const CLASSIFIER_SYSTEM_PROMPT: &str = "You are an extremely strict image classifier for city landmarks. \
Choose only among the candidate ids you are given. Never invent an id. \
If nothing in the photo matches a candidate, answer with the single line none:0.";

/// Output directive appended after the candidate table.
pub const OUTPUT_FORMAT_DIRECTIVE: &str = "Answer with up to 3 ranked guesses, most likely first, one per line, \
in the exact form id:confidence where confidence is a number between 0 and 1. \
Do not add any other text.";

/// A single completion request for the vision model.
#[derive(Debug, Clone)]
pub struct VisionPrompt {
    pub system: String,
    pub instruction: String,
    pub image: Bytes,
    pub mime: ImageMime,
}

impl VisionPrompt {
    /// The image as a `data:` URL for chat-completions style APIs.
    pub fn image_data_url(&self) -> String {
        use base64::Engine as _;
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.image);
        format!("data:{};base64,{}", self.mime.as_str(), encoded)
    }
}

/// Render the catalog as `- id: hint` lines. Names are not included.
pub fn render_candidates(catalog: &Catalog) -> String {
    catalog
        .entries()
        .iter()
        .map(|entry| {
            let hint = entry.hint_en.trim();
            if hint.is_empty() {
                format!("- {}", entry.id)
            } else {
                format!("- {}: {}", entry.id, hint)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the completion request for a validated upload. Every catalog entry
/// is offered as a candidate.
pub fn build_prompt(request: &RecognitionRequest, catalog: &Catalog) -> VisionPrompt {
    let instruction = format!(
        "Candidates (id: visual hint):\n{}\n\n{}",
        render_candidates(catalog),
        OUTPUT_FORMAT_DIRECTIVE
    );
    VisionPrompt {
        system: CLASSIFIER_SYSTEM_PROMPT.to_string(),
        instruction,
        image: request.image.clone(),
        mime: request.mime,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Lang;

    fn catalog() -> Catalog {
        Catalog::from_json(
            r#"[{"id":"bayterek","name_ru":"Байтерек","name_en":"Bayterek Tower","hint_en":"lattice tower, golden sphere"},{"id":"mosque","name_en":"Grand Mosque"}]"#,
        )
        .unwrap()
    }

    fn request() -> RecognitionRequest {
        RecognitionRequest {
            image: Bytes::from_static(b"\x89PNG"),
            mime: ImageMime::Png,
            lang: Lang::En,
            persona: None,
        }
    }

    #[test]
    fn prompt_lists_every_candidate_without_names() {
        let prompt = build_prompt(&request(), &catalog());
        assert!(prompt
            .instruction
            .contains("- bayterek: lattice tower, golden sphere"));
        assert!(prompt.instruction.contains("- mosque\n"));
        assert!(!prompt.instruction.contains("Bayterek Tower"));
        assert!(!prompt.instruction.contains("Байтерек"));
        assert!(prompt.instruction.ends_with(OUTPUT_FORMAT_DIRECTIVE));
        assert_eq!(prompt.system, CLASSIFIER_SYSTEM_PROMPT);
    }

    #[test]
    fn data_url_uses_declared_mime() {
        let prompt = build_prompt(&request(), &catalog());
        assert!(prompt.image_data_url().starts_with("data:image/png;base64,"));
    }
}
