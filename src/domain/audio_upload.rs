use std::fmt;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use futures::Stream;

use super::media_class::MediaClass;

const OCTET_STREAM: &str = "application/octet-stream";

/// Chunks of a file body that is still arriving from the caller.
pub type AudioChunks = Pin<Box<dyn Stream<Item = Result<Bytes, UploadInterrupted>> + Send>>;

/// The inbound upload stopped before the file part was complete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("upload interrupted: {0}")]
pub struct UploadInterrupted(pub String);

/// Handle to a streamed file body. The chunks can be taken exactly once;
/// clones share the same underlying stream.
#[derive(Clone)]
pub struct AudioStream(Arc<Mutex<Option<AudioChunks>>>);

impl AudioStream {
    pub fn new(chunks: AudioChunks) -> Self {
        Self(Arc::new(Mutex::new(Some(chunks))))
    }

    /// Hands the chunks to the first caller; later calls get `None`.
    pub fn take(&self) -> Option<AudioChunks> {
        self.0
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }
}

impl fmt::Debug for AudioStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioStream").finish_non_exhaustive()
    }
}

impl PartialEq for AudioStream {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Where the file bytes live.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioBody {
    /// Fully received; reference counted so forwarding never copies it.
    Buffered(Bytes),
    /// Piped through to the engine as it arrives.
    Streaming(AudioStream),
}

/// An uploaded audio file as received from the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub body: AudioBody,
}

impl AudioUpload {
    pub fn new(filename: impl Into<String>, content_type: Option<String>, data: Bytes) -> Self {
        Self::with_body(filename, content_type, AudioBody::Buffered(data))
    }

    pub fn streaming(
        filename: impl Into<String>,
        content_type: Option<String>,
        chunks: AudioStream,
    ) -> Self {
        Self::with_body(filename, content_type, AudioBody::Streaming(chunks))
    }

    fn with_body(filename: impl Into<String>, content_type: Option<String>, body: AudioBody) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.filter(|ct| !ct.trim().is_empty()),
            body,
        }
    }

    pub fn media_class(&self) -> MediaClass {
        MediaClass::from_mime(self.content_type.as_deref())
    }

    /// Known only once the whole file has been received.
    pub fn size_bytes(&self) -> Option<u64> {
        self.bytes().map(|data| data.len() as u64)
    }

    pub fn bytes(&self) -> Option<&Bytes> {
        match &self.body {
            AudioBody::Buffered(data) => Some(data),
            AudioBody::Streaming(_) => None,
        }
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self.body, AudioBody::Streaming(_))
    }

    /// Content type to declare on the forwarded part: the declared
    /// `type/subtype` without parameters, or octet-stream when the
    /// declaration is absent or not a well-formed media type.
    pub fn forwarded_mime(&self) -> &str {
        let essence = match self.content_type.as_deref() {
            Some(declared) => declared.split(';').next().unwrap_or_default().trim(),
            None => return OCTET_STREAM,
        };

        match essence.split_once('/') {
            Some((kind, subtype)) if is_token(kind) && is_token(subtype) => essence,
            _ => OCTET_STREAM,
        }
    }
}

fn is_token(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$&^_.+-".contains(&b))
}
