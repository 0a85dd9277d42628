//! Incremental decoding of an engine response body into [`DownstreamFrame`]s.
//!
//! Bytes are buffered only until the current frame is complete; a frame that
//! grows past the configured limit fails the stream instead of growing the
//! buffer without bound.

use bytes::{Bytes, BytesMut};
use futures::stream::{Stream, StreamExt};

use crate::application::ports::{
    DownstreamFrame, EventEnvelope, FrameStream, TranscriptionClientError,
};
use crate::domain::TranscriptFragment;

use super::response_shape::ResponseShape;

const DONE_MARKER: &str = "[DONE]";

pub struct FrameDecoder {
    shape: ResponseShape,
    max_frame_bytes: usize,
}

/// Fields of the server-sent event currently being assembled.
#[derive(Default)]
struct PendingEvent {
    event: Option<String>,
    id: Option<String>,
    data: Option<String>,
}

impl PendingEvent {
    fn is_empty(&self) -> bool {
        self.event.is_none() && self.id.is_none() && self.data.is_none()
    }

    fn data_len(&self) -> usize {
        self.data.as_ref().map_or(0, String::len)
    }
}

impl FrameDecoder {
    pub fn new(shape: ResponseShape, max_frame_bytes: usize) -> Self {
        Self {
            shape,
            max_frame_bytes,
        }
    }

    pub fn decode<S>(self, body: S) -> FrameStream
    where
        S: Stream<Item = Result<Bytes, TranscriptionClientError>> + Send + 'static,
    {
        Box::pin(async_stream::stream! {
            let mut body = Box::pin(body);
            let mut buffer = BytesMut::with_capacity(8192);
            let mut pending = PendingEvent::default();
            let mut scanned = 0;

            loop {
                if self.shape.is_streaming() {
                    while let Some(line) = take_line(&mut buffer, &mut scanned) {
                        match self.on_line(&line, &mut pending) {
                            Ok(Some(frame)) => yield Ok(frame),
                            Ok(None) => {}
                            Err(e) => {
                                yield Err(e);
                                return;
                            }
                        }
                    }
                }

                if buffer.len() + pending.data_len() > self.max_frame_bytes {
                    yield Err(TranscriptionClientError::MalformedFrame(format!(
                        "frame exceeds {} bytes",
                        self.max_frame_bytes
                    )));
                    return;
                }

                match body.next().await {
                    Some(Ok(chunk)) => buffer.extend_from_slice(&chunk),
                    Some(Err(e)) => {
                        yield Err(e);
                        return;
                    }
                    None => break,
                }
            }

            match self.finish(buffer, pending) {
                Ok(Some(frame)) => yield Ok(frame),
                Ok(None) => {}
                Err(e) => yield Err(e),
            }
        })
    }

    fn on_line(
        &self,
        line: &[u8],
        pending: &mut PendingEvent,
    ) -> Result<Option<DownstreamFrame>, TranscriptionClientError> {
        let line = std::str::from_utf8(line).map_err(|e| {
            TranscriptionClientError::MalformedFrame(format!("invalid utf-8 in frame: {e}"))
        })?;

        match self.shape {
            ResponseShape::BareStream => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                Ok(parse_payload(trimmed.as_bytes())?.map(DownstreamFrame::Bare))
            }
            ResponseShape::EventStream => {
                if line.is_empty() {
                    return dispatch_event(std::mem::take(pending));
                }
                apply_field(line, pending);
                Ok(None)
            }
            ResponseShape::Single => Ok(None),
        }
    }

    /// Handles whatever is left once the body has ended.
    fn finish(
        &self,
        buffer: BytesMut,
        mut pending: PendingEvent,
    ) -> Result<Option<DownstreamFrame>, TranscriptionClientError> {
        match self.shape {
            ResponseShape::Single => {
                if buffer.iter().all(u8::is_ascii_whitespace) {
                    return Err(TranscriptionClientError::MalformedFrame(
                        "empty response body".to_string(),
                    ));
                }
                Ok(parse_payload(&buffer)?.map(DownstreamFrame::Bare))
            }
            ResponseShape::BareStream => self.on_line(&buffer, &mut pending),
            ResponseShape::EventStream => {
                if !buffer.is_empty() {
                    let line = self.trailing_line(&buffer)?;
                    apply_field(line, &mut pending);
                }
                dispatch_event(pending)
            }
        }
    }

    fn trailing_line<'a>(&self, buffer: &'a [u8]) -> Result<&'a str, TranscriptionClientError> {
        let line = std::str::from_utf8(buffer).map_err(|e| {
            TranscriptionClientError::MalformedFrame(format!("invalid utf-8 in frame: {e}"))
        })?;
        Ok(line.trim_end_matches('\r'))
    }
}

/// Splits one `\n`-terminated line off the front of the buffer, without the terminator.
///
/// `scanned` remembers how much of a partial line has already been searched,
/// so each byte is inspected once however the line is chunked.
fn take_line(buffer: &mut BytesMut, scanned: &mut usize) -> Option<BytesMut> {
    let newline = match buffer[*scanned..].iter().position(|&b| b == b'\n') {
        Some(offset) => *scanned + offset,
        None => {
            *scanned = buffer.len();
            return None;
        }
    };
    *scanned = 0;
    let mut line = buffer.split_to(newline + 1);
    line.truncate(newline);
    if line.last() == Some(&b'\r') {
        line.truncate(line.len() - 1);
    }
    Some(line)
}

fn apply_field(line: &str, pending: &mut PendingEvent) {
    if line.starts_with(':') {
        return;
    }

    let (field, value) = match line.split_once(':') {
        Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
        None => (line, ""),
    };

    match field {
        "data" => match pending.data.as_mut() {
            Some(data) => {
                data.push('\n');
                data.push_str(value);
            }
            None => pending.data = Some(value.to_string()),
        },
        "event" => pending.event = Some(value.to_string()),
        "id" => pending.id = Some(value.to_string()),
        _ => {}
    }
}

fn dispatch_event(pending: PendingEvent) -> Result<Option<DownstreamFrame>, TranscriptionClientError> {
    if pending.is_empty() {
        return Ok(None);
    }

    let data = match pending.data.as_deref().map(str::trim) {
        None | Some("") | Some(DONE_MARKER) => None,
        Some(raw) => parse_payload(raw.as_bytes())?,
    };

    Ok(Some(DownstreamFrame::Envelope(EventEnvelope {
        event: pending.event,
        id: pending.id,
        data,
    })))
}

/// A JSON `null` payload carries no text and decodes to `None`.
fn parse_payload(raw: &[u8]) -> Result<Option<TranscriptFragment>, TranscriptionClientError> {
    serde_json::from_slice::<Option<TranscriptFragment>>(raw)
        .map_err(|e| TranscriptionClientError::MalformedFrame(format!("invalid payload: {e}")))
}
