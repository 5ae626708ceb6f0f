//! AI provider collaborator interface

use crate::error::{Result, ResumeScorerError};

/// One completion request to the AI collaborator.
#[derive(Debug, Clone)]
pub struct AiRequest {
    pub prompt: String,
    pub temperature: f32,
    pub max_output_tokens: usize,
}

/// External AI text-completion collaborator. Implementations return free
/// text expected to contain exactly one JSON object; transport and timeout
/// failures must surface as the distinguishable AI error kinds.
pub trait AiProvider: Send + Sync {
    fn complete(&self, request: &AiRequest) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Provider used when no AI backend is configured. Every call reports a
/// transport failure so the reliability gate routes straight to fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAiProvider;

impl AiProvider for NullAiProvider {
    async fn complete(&self, _request: &AiRequest) -> Result<String> {
        Err(ResumeScorerError::AiTransport(
            "no AI provider configured".to_string(),
        ))
    }
}
