use std::time::Duration;

use async_trait::async_trait;
use futures::stream::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::multipart;

use crate::application::ports::{FrameStream, TranscriptionClient, TranscriptionClientError};
use crate::domain::{AudioBody, AudioUpload, TranscriptionRequest};
use crate::infrastructure::observability::ExchangeLogger;
use crate::presentation::config::WhisperSettings;

use super::frame_decoder::FrameDecoder;
use super::response_shape::ResponseShape;

const ACCEPTED_RESPONSE_TYPES: &str = "text/event-stream, application/x-ndjson, application/json";
const ERROR_BODY_LIMIT: usize = 4096;

/// Client for a faster-whisper compatible `/v1/audio/transcriptions` endpoint.
///
/// The inner `reqwest::Client` holds the shared connection pool; clones of it
/// are cheap and concurrent calls never serialize on each other.
pub struct FasterWhisperClient {
    client: reqwest::Client,
    endpoint: String,
    max_frame_bytes: usize,
    exchange_logger: Option<ExchangeLogger>,
}

impl FasterWhisperClient {
    pub fn new(settings: &WhisperSettings) -> Result<Self, TranscriptionClientError> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .pool_max_idle_per_host(settings.pool_max_idle_per_host);

        if let Some(secs) = settings.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder
            .build()
            .map_err(|e| TranscriptionClientError::InvalidRequest(format!("http client: {}", e)))?;

        let exchange_logger = settings.log_exchanges.then(|| {
            ExchangeLogger::new(Duration::from_millis(settings.slow_request_threshold_ms))
        });

        Ok(Self {
            client,
            endpoint: join_url(&settings.base_url, &settings.transcription_path),
            max_frame_bytes: settings.max_frame_bytes,
            exchange_logger,
        })
    }

    pub fn with_exchange_logger(mut self, exchange_logger: Option<ExchangeLogger>) -> Self {
        self.exchange_logger = exchange_logger;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_form(
        request: &TranscriptionRequest,
    ) -> Result<multipart::Form, TranscriptionClientError> {
        Ok(multipart::Form::new()
            .part("file", audio_part(request.audio())?)
            .text("language", request.language().to_string())
            .text("model", request.model().to_string())
            .text("stream", request.stream().to_string()))
    }
}

#[async_trait]
impl TranscriptionClient for FasterWhisperClient {
    async fn transcribe(
        &self,
        request: &TranscriptionRequest,
    ) -> Result<FrameStream, TranscriptionClientError> {
        let http_request = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, ACCEPTED_RESPONSE_TYPES)
            .multipart(Self::build_form(request)?)
            .build()
            .map_err(|e| TranscriptionClientError::InvalidRequest(e.to_string()))?;

        let exchange = self.exchange_logger.map(|logger| logger.start(&http_request));

        let response = match self.client.execute(http_request).await {
            Ok(response) => response,
            Err(e) => {
                let error = classify_transport_error(e);
                if let Some(exchange) = exchange {
                    exchange.failed(&error);
                }
                return Err(error);
            }
        };

        if let Some(exchange) = exchange {
            exchange.responded(&response);
        }

        let status = response.status();
        if !status.is_success() {
            let message = read_error_body(response).await;
            return Err(TranscriptionClientError::UpstreamStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Error").to_string(),
                message,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok());
        let shape = ResponseShape::from_content_type(content_type);

        tracing::debug!(
            content_type = content_type.unwrap_or("<none>"),
            shape = shape.as_str(),
            "Resolved downstream response shape"
        );

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(classify_transport_error));

        Ok(FrameDecoder::new(shape, self.max_frame_bytes).decode(body))
    }
}

/// Buffered uploads go out with a known length; streamed ones are sent
/// chunked as they arrive from the caller.
fn audio_part(audio: &AudioUpload) -> Result<multipart::Part, TranscriptionClientError> {
    let part = match &audio.body {
        AudioBody::Buffered(data) => multipart::Part::stream_with_length(
            reqwest::Body::from(data.clone()),
            data.len() as u64,
        ),
        AudioBody::Streaming(chunks) => {
            let chunks = chunks.take().ok_or_else(|| {
                TranscriptionClientError::InvalidRequest(
                    "streamed upload was already forwarded".to_string(),
                )
            })?;
            multipart::Part::stream(reqwest::Body::wrap_stream(chunks))
        }
    };

    part.file_name(audio.filename.clone())
        .mime_str(audio.forwarded_mime())
        .map_err(|e| TranscriptionClientError::InvalidRequest(format!("content type: {}", e)))
}

fn classify_transport_error(error: reqwest::Error) -> TranscriptionClientError {
    if error.is_timeout() {
        TranscriptionClientError::Timeout(error.to_string())
    } else if error.is_builder() {
        TranscriptionClientError::InvalidRequest(error.to_string())
    } else {
        TranscriptionClientError::Unreachable(error.to_string())
    }
}

/// Reads at most [`ERROR_BODY_LIMIT`] bytes of an error response for diagnostics.
async fn read_error_body(response: reqwest::Response) -> String {
    let mut body = Vec::new();
    let mut chunks = response.bytes_stream();

    while let Some(Ok(chunk)) = chunks.next().await {
        let remaining = ERROR_BODY_LIMIT - body.len();
        body.extend_from_slice(&chunk[..chunk.len().min(remaining)]);
        if body.len() >= ERROR_BODY_LIMIT {
            break;
        }
    }

    let text = String::from_utf8_lossy(&body).trim().to_string();
    if text.is_empty() {
        "no response body".to_string()
    } else {
        text
    }
}

fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
