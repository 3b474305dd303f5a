use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::ai::{CompletionClient, VisionPrompt};
use crate::catalog::Catalog;
use crate::error::ProviderError;
use crate::recognize::Recognizer;

pub const TEST_LANDMARKS_JSON: &str = r#"[{"id":"bayterek","name_ru":"Байтерек","name_kk":"Бәйтерек","name_en":"Bayterek Tower","hint_en":"white lattice tower holding a golden sphere"},{"id":"khan_shatyr","name_ru":"Хан Шатыр","name_kk":"Хан Шатыр","name_en":"Khan Shatyr","hint_en":"giant tilted transparent tent"},{"id":"botanical_garden","name_ru":"Ботанический сад","name_kk":"Ботаникалық бақ","name_en":"Botanical Garden","hint_en":"greenhouses and park alleys"}]"#;

pub fn test_catalog() -> Arc<Catalog> {
    Arc::new(Catalog::from_json(TEST_LANDMARKS_JSON).expect("test catalog"))
}

/// Answers every prompt with the same text and counts the calls.
pub struct CannedClient {
    reply: Result<String, fn() -> ProviderError>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl CannedClient {
    pub fn text(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            calls: AtomicUsize::new(0),
            delay: None,
        })
    }

    pub fn failing(err: fn() -> ProviderError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(err),
            calls: AtomicUsize::new(0),
            delay: None,
        })
    }

    pub fn slow(reply: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            calls: AtomicUsize::new(0),
            delay: Some(delay),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionClient for CannedClient {
    async fn complete(&self, _prompt: &VisionPrompt) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(make) => Err(make()),
        }
    }
}

pub fn test_recognizer(client: Arc<CannedClient>) -> Recognizer {
    Recognizer::new(test_catalog(), client, Duration::from_secs(5))
}

const BOUNDARY: &str = "landmark-test-boundary";

/// Build a multipart/form-data body. Returns the content type header and body.
pub fn multipart_body(file: Option<(&str, &[u8])>, fields: &[(&str, &str)]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((content_type, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"photo\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}
