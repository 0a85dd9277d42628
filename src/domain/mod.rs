mod audio_upload;
mod media_class;
mod relay_event;
mod transcript_fragment;
mod transcription_request;

pub use audio_upload::{AudioBody, AudioChunks, AudioStream, AudioUpload, UploadInterrupted};
pub use media_class::MediaClass;
pub use relay_event::RelayEvent;
pub use transcript_fragment::TranscriptFragment;
pub use transcription_request::{DEFAULT_LANGUAGE, DEFAULT_MODEL, TranscriptionRequest};
