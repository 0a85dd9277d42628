mod transcription_client;

pub use transcription_client::{
    DownstreamFrame, EventEnvelope, FrameStream, TranscriptionClient, TranscriptionClientError,
};
