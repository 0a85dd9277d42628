use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::domain::{TranscriptFragment, TranscriptionRequest};

/// Raw downstream frames, pulled one at a time from the engine response.
pub type FrameStream =
    Pin<Box<dyn Stream<Item = Result<DownstreamFrame, TranscriptionClientError>> + Send>>;

/// Port to the remote speech-to-text engine.
///
/// One call per request, no retries. Failures before the first frame are
/// returned directly; failures after it surface as an `Err` item in the stream.
#[async_trait]
pub trait TranscriptionClient: Send + Sync {
    async fn transcribe(
        &self,
        request: &TranscriptionRequest,
    ) -> Result<FrameStream, TranscriptionClientError>;
}

/// A single wire unit from the engine, tagged by response shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownstreamFrame {
    /// A bare payload: the frame is the fragment.
    Bare(TranscriptFragment),
    /// A typed event that may or may not carry a payload.
    Envelope(EventEnvelope),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventEnvelope {
    pub event: Option<String>,
    pub id: Option<String>,
    pub data: Option<TranscriptFragment>,
}

impl EventEnvelope {
    pub fn with_data(fragment: TranscriptFragment) -> Self {
        Self {
            data: Some(fragment),
            ..Self::default()
        }
    }

    pub fn heartbeat() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranscriptionClientError {
    #[error("downstream returned {status} {reason}: {message}")]
    UpstreamStatus {
        status: u16,
        reason: String,
        message: String,
    },
    #[error("downstream unreachable: {0}")]
    Unreachable(String),
    #[error("downstream timed out: {0}")]
    Timeout(String),
    #[error("malformed frame: {0}")]
    MalformedFrame(String),
    #[error("invalid outbound request: {0}")]
    InvalidRequest(String),
}
