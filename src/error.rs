//! Error handling for the resume scorer

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeScorerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Computation error: {0}")]
    Computation(String),

    #[error("AI transport error: {0}")]
    AiTransport(String),

    #[error("AI call timed out after {0:?}")]
    AiTimeout(Duration),

    #[error("AI response contained no parseable JSON object: {0}")]
    AiMalformedResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, ResumeScorerError>;

impl ResumeScorerError {
    /// Short machine-readable code used in failure log records.
    pub fn code(&self) -> &'static str {
        match self {
            ResumeScorerError::Io(_) => "io",
            ResumeScorerError::Extraction(_) => "extraction",
            ResumeScorerError::Validation(_) => "validation",
            ResumeScorerError::Configuration(_) => "configuration",
            ResumeScorerError::Computation(_) => "computation",
            ResumeScorerError::AiTransport(_) => "ai_transport",
            ResumeScorerError::AiTimeout(_) => "ai_timeout",
            ResumeScorerError::AiMalformedResponse(_) => "ai_malformed_response",
            ResumeScorerError::Serialization(_) => "serialization",
            ResumeScorerError::InvalidInput(_) => "invalid_input",
        }
    }

    /// True for failures of the AI collaborator itself (transport, timeout,
    /// unparseable output) that the reliability gate may retry.
    pub fn is_ai_failure(&self) -> bool {
        matches!(
            self,
            ResumeScorerError::AiTransport(_)
                | ResumeScorerError::AiTimeout(_)
                | ResumeScorerError::AiMalformedResponse(_)
        )
    }
}

/// Convert anyhow errors from collaborator glue into our error type
impl From<anyhow::Error> for ResumeScorerError {
    fn from(err: anyhow::Error) -> Self {
        ResumeScorerError::Extraction(err.to_string())
    }
}
