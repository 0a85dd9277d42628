use std::sync::Arc;

use crate::application::ports::{TranscriptionClient, TranscriptionClientError};

use super::request_normalizer::{RawTranscriptionRequest, RequestNormalizer, ValidationError};
use super::response_adapter::{FragmentStream, ResponseAdapter};

/// Normalizes a request, forwards it once, and hands back the canonical stream.
pub struct RelayService {
    normalizer: RequestNormalizer,
    client: Arc<dyn TranscriptionClient>,
}

impl RelayService {
    pub fn new(normalizer: RequestNormalizer, client: Arc<dyn TranscriptionClient>) -> Self {
        Self { normalizer, client }
    }

    pub fn normalizer(&self) -> &RequestNormalizer {
        &self.normalizer
    }

    /// Validation happens before any downstream call; a rejected request never
    /// reaches the engine.
    pub async fn relay(&self, raw: RawTranscriptionRequest) -> Result<FragmentStream, RelayError> {
        let request = self.normalizer.normalize(raw)?;

        tracing::info!(
            filename = %request.audio().filename,
            media_class = request.audio().media_class().as_str(),
            bytes = ?request.audio().size_bytes(),
            streaming = request.audio().is_streaming(),
            language = %request.language(),
            model = %request.model(),
            stream = request.stream(),
            "Forwarding transcription request"
        );

        let frames = self.client.transcribe(&request).await?;

        Ok(ResponseAdapter::adapt(frames))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("validation: {0}")]
    Validation(#[from] ValidationError),
    #[error("downstream: {0}")]
    Downstream(#[from] TranscriptionClientError),
}
