use axum::{
    body::Body,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Extension, Multipart, State,
    },
    http::{HeaderName, Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{ProviderError, RecognizeError};
use crate::messages;
use crate::recognize::Recognizer;
use crate::system_info::get_system_info;
use crate::validate::{validate_upload, RawUpload, UploadedFile};

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: &'static str,
    request_id: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    landmarks: usize,
    version: String,
}

#[derive(Clone)]
pub struct AppState {
    pub recognizer: Recognizer,
    pub max_upload_bytes: usize,
}

#[derive(Clone, Debug)]
struct RequestContext {
    request_id: String,
}

pub fn router(state: AppState) -> Router {
    // Leave headroom so oversized files reach the validator and get a proper 413.
    let body_limit = state.max_upload_bytes.saturating_mul(2).max(64 * 1024);
    let request_id_layer = middleware::from_fn(assign_request_id);
    Router::new()
        .route("/recognize", post(recognize))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
        .layer(request_id_layer)
}

#[tracing::instrument(level = "debug", skip_all)]
async fn recognize(
    State(state): State<AppState>,
    Extension(request): Extension<RequestContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let request_id = request.request_id;
    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::debug!(request_id, error = %rejection, "Rejected non-multipart request");
            return error_response(
                StatusCode::BAD_REQUEST,
                "invalid_request",
                messages::INVALID_REQUEST,
                request_id,
            );
        }
    };

    let raw = match read_upload(multipart).await {
        Ok(raw) => raw,
        Err(err) if err.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            tracing::debug!(request_id, error = %err, "Multipart body over the limit");
            return error_response(
                StatusCode::PAYLOAD_TOO_LARGE,
                "payload_too_large",
                messages::FILE_TOO_LARGE,
                request_id,
            );
        }
        Err(err) => {
            tracing::debug!(request_id, error = %err, "Failed to read multipart body");
            return error_response(
                StatusCode::BAD_REQUEST,
                "invalid_request",
                messages::INVALID_REQUEST,
                request_id,
            );
        }
    };

    if raw.file.as_ref().is_some_and(|f| f.content_type.is_none()) {
        tracing::debug!(request_id, "file part has no content type");
        return error_response(
            StatusCode::BAD_REQUEST,
            "invalid_request",
            messages::INVALID_REQUEST,
            request_id,
        );
    }

    let validated = match validate_upload(raw, state.max_upload_bytes) {
        Ok(validated) => validated,
        Err(err) => {
            tracing::debug!(request_id, error = %err, "Upload rejected");
            return recognize_error_response(&err, request_id);
        }
    };

    match state.recognizer.recognize(validated, request_id.clone()).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => {
            tracing::error!(request_id, error = %err, "Recognition failed");
            recognize_error_response(&err, request_id)
        }
    }
}

async fn health(State(state): State<AppState>) -> Response {
    let response = HealthResponse {
        status: "ok",
        landmarks: state.recognizer.catalog().len(),
        version: get_system_info(),
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// Collect the `file`, `lang` and `persona` parts. Unknown parts are skipped.
async fn read_upload(mut multipart: Multipart) -> Result<RawUpload, MultipartError> {
    let mut raw = RawUpload::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                tracing::trace!(size = bytes.len(), ?content_type, "read file part");
                raw.file = Some(UploadedFile {
                    content_type,
                    bytes,
                });
            }
            "lang" => raw.lang = Some(field.text().await?),
            "persona" => raw.persona = Some(field.text().await?),
            other => tracing::trace!(field = other, "ignoring multipart field"),
        }
    }
    Ok(raw)
}

async fn assign_request_id(mut req: Request<Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    req.extensions_mut().insert(RequestContext {
        request_id: request_id.clone(),
    });
    let method = req.method().clone();
    let uri = req.uri().clone();
    let response = next.run(req).await;
    let status = response.status();
    let mut response = response;
    let header_value = match request_id.parse() {
        Ok(value) => value,
        Err(_) => {
            return response;
        }
    };
    response
        .headers_mut()
        .insert(HeaderName::from_static("x-request-id"), header_value);
    tracing::debug!(
        request_id,
        method = %method,
        uri = %uri,
        status = %status,
        "API request completed"
    );
    response
}

/// Status code and stable error code for each failure kind.
fn classify_error(err: &RecognizeError) -> (StatusCode, &'static str, &'static str) {
    match err {
        RecognizeError::MissingFile => {
            (StatusCode::BAD_REQUEST, "missing_file", messages::MISSING_FILE)
        }
        RecognizeError::PayloadTooLarge { .. } => {
            (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large", messages::FILE_TOO_LARGE)
        }
        RecognizeError::UnsupportedMediaType(_) => (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "unsupported_media_type",
            messages::UNSUPPORTED_MEDIA_TYPE,
        ),
        RecognizeError::Provider(ProviderError::Timeout(_)) => {
            (StatusCode::GATEWAY_TIMEOUT, "provider_timeout", messages::PROVIDER_TIMEOUT)
        }
        RecognizeError::Provider(_) => {
            (StatusCode::BAD_GATEWAY, "provider_failure", messages::PROVIDER_FAILURE)
        }
        RecognizeError::Configuration(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", messages::INTERNAL_ERROR)
        }
    }
}

fn recognize_error_response(err: &RecognizeError, request_id: String) -> Response {
    let (status, error, message) = classify_error(err);
    error_response(status, error, message, request_id)
}

fn error_response(
    status: StatusCode,
    error: &'static str,
    message: &'static str,
    request_id: String,
) -> Response {
    (
        status,
        Json(ErrorResponse {
            error,
            message,
            request_id,
        }),
    )
        .into_response()
}
