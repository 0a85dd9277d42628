use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use futures::stream::{self, StreamExt};

use crate::application::ports::{
    DownstreamFrame, EventEnvelope, FrameStream, TranscriptionClient, TranscriptionClientError,
};
use crate::domain::{AudioBody, AudioUpload, TranscriptFragment, TranscriptionRequest};

type ScriptedFrame = Result<DownstreamFrame, TranscriptionClientError>;

/// Replays a fixed frame script instead of calling an engine.
///
/// Records every request it receives so callers can inspect what would have
/// been forwarded. A streamed upload is drained first and recorded buffered.
pub struct MockTranscriptionClient {
    script: Vec<ScriptedFrame>,
    failure: Option<TranscriptionClientError>,
    frame_delay: Duration,
    requests: Mutex<Vec<TranscriptionRequest>>,
    streamed_uploads: AtomicUsize,
}

impl MockTranscriptionClient {
    pub fn with_script(script: Vec<ScriptedFrame>) -> Self {
        Self {
            script,
            failure: None,
            frame_delay: Duration::ZERO,
            requests: Mutex::new(Vec::new()),
            streamed_uploads: AtomicUsize::new(0),
        }
    }

    pub fn with_frames(frames: Vec<DownstreamFrame>) -> Self {
        Self::with_script(frames.into_iter().map(Ok).collect())
    }

    pub fn with_fragments(texts: &[&str]) -> Self {
        Self::with_frames(
            texts
                .iter()
                .map(|t| DownstreamFrame::Bare(TranscriptFragment::new(*t)))
                .collect(),
        )
    }

    /// Fails the call itself, before any frame.
    pub fn failing(error: TranscriptionClientError) -> Self {
        Self {
            failure: Some(error),
            ..Self::with_script(Vec::new())
        }
    }

    /// Script used when the server runs without a real engine.
    pub fn scaffold(frame_delay_ms: u64) -> Self {
        Self::with_frames(vec![
            DownstreamFrame::Envelope(EventEnvelope::with_data(TranscriptFragment::new(
                "Scaffold transcription:",
            ))),
            DownstreamFrame::Envelope(EventEnvelope::heartbeat()),
            DownstreamFrame::Envelope(EventEnvelope::with_data(TranscriptFragment::new(
                " no engine is attached.",
            ))),
        ])
        .with_frame_delay(Duration::from_millis(frame_delay_ms))
    }

    pub fn with_frame_delay(mut self, frame_delay: Duration) -> Self {
        self.frame_delay = frame_delay;
        self
    }

    pub fn requests(&self) -> Vec<TranscriptionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// How many received requests carried a streamed rather than buffered file.
    pub fn streamed_upload_count(&self) -> usize {
        self.streamed_uploads.load(Ordering::SeqCst)
    }

    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

impl MockTranscriptionClient {
    async fn drain_upload(
        &self,
        request: &TranscriptionRequest,
    ) -> Result<TranscriptionRequest, TranscriptionClientError> {
        let audio = request.audio();
        let AudioBody::Streaming(upload) = &audio.body else {
            return Ok(request.clone());
        };
        self.streamed_uploads.fetch_add(1, Ordering::SeqCst);

        let mut chunks = upload.take().ok_or_else(|| {
            TranscriptionClientError::InvalidRequest(
                "streamed upload was already forwarded".to_string(),
            )
        })?;
        let mut data = BytesMut::new();
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(|e| TranscriptionClientError::Unreachable(e.to_string()))?;
            data.extend_from_slice(&chunk);
        }

        Ok(TranscriptionRequest::new(
            AudioUpload::new(
                audio.filename.clone(),
                audio.content_type.clone(),
                data.freeze(),
            ),
            request.language().to_string(),
            request.model().to_string(),
            request.stream(),
        ))
    }
}

#[async_trait]
impl TranscriptionClient for MockTranscriptionClient {
    async fn transcribe(
        &self,
        request: &TranscriptionRequest,
    ) -> Result<FrameStream, TranscriptionClientError> {
        let recorded = self.drain_upload(request).await?;
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(recorded);

        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        let delay = self.frame_delay;
        let frames = stream::iter(self.script.clone()).then(move |frame| async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            frame
        });

        Ok(Box::pin(frames))
    }
}
