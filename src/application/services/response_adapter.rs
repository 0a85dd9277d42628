use std::pin::Pin;

use futures::future;
use futures::stream::{Stream, StreamExt};

use crate::application::ports::{DownstreamFrame, FrameStream, TranscriptionClientError};
use crate::domain::TranscriptFragment;

/// Canonical, shape-independent fragments in arrival order.
pub type FragmentStream =
    Pin<Box<dyn Stream<Item = Result<TranscriptFragment, TranscriptionClientError>> + Send>>;

/// Flattens both downstream wire shapes into one fragment sequence.
///
/// Stateless: the same frames always yield the same fragments. No text is
/// touched, merged or reordered.
pub struct ResponseAdapter;

impl ResponseAdapter {
    /// The fragment carried by a frame, if any. Payload-less envelopes are heartbeats.
    pub fn fragment_of(frame: DownstreamFrame) -> Option<TranscriptFragment> {
        match frame {
            DownstreamFrame::Bare(fragment) => Some(fragment),
            DownstreamFrame::Envelope(envelope) => envelope.data,
        }
    }

    pub fn adapt(frames: FrameStream) -> FragmentStream {
        Box::pin(frames.filter_map(|item| {
            future::ready(match item {
                Ok(frame) => Self::fragment_of(frame).map(Ok),
                Err(e) => Some(Err(e)),
            })
        }))
    }
}
