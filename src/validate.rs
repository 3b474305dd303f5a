use bytes::Bytes;
use tracing::{debug, instrument};

use crate::error::RecognizeError;
use crate::types::{ImageMime, Lang, Persona};

/// Default upload ceiling: 5 MB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// A file part as received from the multipart body.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Raw multipart fields before any validation.
#[derive(Debug, Clone, Default)]
pub struct RawUpload {
    pub file: Option<UploadedFile>,
    pub lang: Option<String>,
    pub persona: Option<String>,
}

/// A request that passed validation. Never persisted.
#[derive(Debug, Clone)]
pub struct RecognitionRequest {
    pub image: Bytes,
    pub mime: ImageMime,
    pub lang: Lang,
    pub persona: Option<Persona>,
}

/// Check the upload and normalize its options.
///
/// Presence is checked first, then the size ceiling, then the declared type.
/// Image content itself is never inspected.
#[instrument(level = "debug", skip(raw))]
pub fn validate_upload(raw: RawUpload, max_bytes: usize) -> Result<RecognitionRequest, RecognizeError> {
    let file = match raw.file {
        Some(file) if !file.bytes.is_empty() => file,
        _ => return Err(RecognizeError::MissingFile),
    };

    let size = file.bytes.len();
    if size > max_bytes {
        return Err(RecognizeError::PayloadTooLarge {
            size,
            limit: max_bytes,
        });
    }

    let declared = file.content_type.unwrap_or_default();
    let mime = ImageMime::from_content_type(&declared)
        .ok_or(RecognizeError::UnsupportedMediaType(declared))?;

    let lang = Lang::from_field(raw.lang.as_deref());
    let persona = Persona::from_field(raw.persona.as_deref());
    debug!(size, mime = mime.as_str(), lang = lang.code(), ?persona, "upload accepted");

    Ok(RecognitionRequest {
        image: file.bytes,
        mime,
        lang,
        persona,
    })
}
