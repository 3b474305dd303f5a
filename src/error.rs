use thiserror::Error;

/// Failures reported by the completion provider or its output.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    #[error("provider rejected the request: {0}")]
    Rejected(String),
    #[error("provider did not answer within {0} s")]
    Timeout(u64),
    #[error("provider output unusable: {0}")]
    MalformedOutput(String),
}

/// Catalog configuration problems. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("catalog contains no landmarks")]
    Empty,
    #[error("catalog entry #{0} has an empty id")]
    MissingId(usize),
    #[error("duplicate landmark id '{0}'")]
    DuplicateId(String),
}

/// Every way a recognition request can end without a result.
#[derive(Debug, Error)]
pub enum RecognizeError {
    #[error("request has no image file")]
    MissingFile,
    #[error("unsupported media type '{0}'")]
    UnsupportedMediaType(String),
    #[error("payload of {size} bytes exceeds the {limit} byte ceiling")]
    PayloadTooLarge { size: usize, limit: usize },
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("configuration error: {0}")]
    Configuration(#[from] CatalogError),
}
