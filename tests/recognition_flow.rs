use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use landmark_guide::tests::util::{multipart_body, test_catalog, test_recognizer, CannedClient};
use landmark_guide::{router, AppState, Recognizer};
use serde_json::Value;
use tower::ServiceExt;

const MAX_UPLOAD: usize = 5 * 1024 * 1024;

fn app(client: Arc<CannedClient>) -> Router {
    router(AppState {
        recognizer: test_recognizer(client),
        max_upload_bytes: MAX_UPLOAD,
    })
}

async fn post(app: Router, content_type: &str, body: Vec<u8>) -> (StatusCode, Option<String>, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/recognize")
                .header("content-type", content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let header = response
        .headers()
        .get("x-request-id")
        .map(|v| v.to_str().unwrap().to_string());
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, header, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn recognized_jpeg() {
    let client = CannedClient::text("bayterek:0.92");
    let (ct, body) = multipart_body(Some(("image/jpeg", b"\xff\xd8\xff")), &[("lang", "en")]);
    let (status, header, payload) = post(app(client.clone()), &ct, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(client.calls(), 1);
    assert_eq!(payload["lang"], "en");
    assert_eq!(payload["detections"].as_array().unwrap().len(), 1);
    assert_eq!(payload["detections"][0]["id"], "bayterek");
    assert_eq!(payload["detections"][0]["name"], "Bayterek Tower");
    assert_eq!(payload["detections"][0]["confidence"], 0.92);
    let answer = payload["answer"].as_str().unwrap();
    assert!(answer.contains("Bayterek Tower"));
    assert_eq!(header.as_deref(), payload["request_id"].as_str());
    assert!(payload["latency_ms"].as_u64().is_some());
}

#[tokio::test]
async fn low_confidence_png() {
    let client = CannedClient::text("botanical_garden:0.55");
    let (ct, body) = multipart_body(Some(("image/png", b"\x89PNG")), &[("lang", "en")]);
    let (status, _, payload) = post(app(client), &ct, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["detections"][0]["id"], "botanical_garden");
    assert_eq!(payload["detections"][0]["confidence"], 0.55);
    assert_eq!(
        payload["answer"],
        "The landmark could not be identified with confidence. Try taking a closer photo."
    );
}

#[tokio::test]
async fn unparseable_output_is_not_recognized() {
    let client = CannedClient::text("I cannot tell what is in this picture.");
    let (ct, body) = multipart_body(Some(("image/jpeg", b"jpg")), &[("lang", "kk")]);
    let (status, _, payload) = post(app(client), &ct, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["detections"], serde_json::json!([]));
    assert_eq!(payload["answer"], "Нысанды тану мүмкін болмады.");
}

#[tokio::test]
async fn oversized_file_never_reaches_provider() {
    let client = CannedClient::text("bayterek:0.92");
    let image = vec![0u8; 6 * 1024 * 1024];
    let (ct, body) = multipart_body(Some(("image/jpeg", &image)), &[]);
    let (status, _, payload) = post(app(client.clone()), &ct, body).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(payload["error"], "payload_too_large");
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn defaults_to_russian_and_formal() {
    let client = CannedClient::text("bayterek:0.92");
    let (ct, body) = multipart_body(Some(("image/jpeg", b"jpg")), &[]);
    let (status, _, payload) = post(app(client), &ct, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["lang"], "ru");
    assert_eq!(payload["persona"], "formal");
    assert_eq!(payload["detections"][0]["name"], "Байтерек");
    assert_eq!(payload["answer"], "Это Байтерек. Достопримечательность распознана.");
}

#[tokio::test]
async fn humorous_persona_changes_only_tone() {
    let client = CannedClient::text("bayterek:0.92");
    let (ct, body) = multipart_body(
        Some(("image/jpeg", b"jpg")),
        &[("lang", "ru"), ("persona", "humorous")],
    );
    let (_, _, payload) = post(app(client), &ct, body).await;

    assert_eq!(payload["persona"], "humorous");
    assert_eq!(payload["answer"], "Супер! Это Байтерек — квест засчитан!");
    assert_eq!(payload["detections"][0]["confidence"], 0.92);
}

#[tokio::test]
async fn hung_provider_times_out() {
    let client = CannedClient::slow("bayterek:0.92", Duration::from_secs(5));
    let recognizer = Recognizer::new(test_catalog(), client, Duration::from_millis(50));
    let app = router(AppState {
        recognizer,
        max_upload_bytes: MAX_UPLOAD,
    });
    let (ct, body) = multipart_body(Some(("image/png", b"png")), &[]);
    let (status, _, payload) = post(app, &ct, body).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(payload["error"], "provider_timeout");
}

#[tokio::test]
async fn ranked_guesses_are_sorted_and_filtered() {
    let client = CannedClient::text("khan_shatyr: 0.3\neiffel_tower: 0.99\nbayterek: 0.8\nbotanical_garden: 0");
    let (ct, body) = multipart_body(Some(("image/png", b"png")), &[("lang", "en")]);
    let (_, _, payload) = post(app(client), &ct, body).await;

    let ids: Vec<&str> = payload["detections"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["bayterek", "khan_shatyr"]);
}
