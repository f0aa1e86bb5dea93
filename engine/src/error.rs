use thiserror::Error;

/// Failure taxonomy for the question-answering pipeline.
///
/// `Configuration` raised during startup is fatal; every other variant is
/// request-scoped and mapped to an HTTP status by the API layer.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("document download failed: {0}")]
    Download(String),

    #[error("invalid upload: {0}")]
    InvalidUpload(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("text extraction failed: {0}")]
    Extraction(String),

    #[error("model invocation failed: {0}")]
    ModelInvocation(String),

    #[error("persistence failure: {0}")]
    Store(String),
}

impl EngineError {
    /// Stable machine-readable label used in error response bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Configuration(_) => "configuration_error",
            EngineError::Download(_) => "download_error",
            EngineError::InvalidUpload(_) => "invalid_upload",
            EngineError::Validation(_) => "validation_error",
            EngineError::Extraction(_) => "extraction_error",
            EngineError::ModelInvocation(_) => "model_invocation_error",
            EngineError::Store(_) => "store_error",
        }
    }
}
