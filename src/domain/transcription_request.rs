use super::audio_upload::AudioUpload;

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_MODEL: &str = "Systran/faster-whisper-small";

/// A validated, fully defaulted transcription request.
///
/// Only the request normalizer builds these, so `language` and `model` are
/// never empty and the audio content type has already been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionRequest {
    audio: AudioUpload,
    language: String,
    model: String,
    stream: bool,
}

impl TranscriptionRequest {
    pub(crate) fn new(audio: AudioUpload, language: String, model: String, stream: bool) -> Self {
        Self {
            audio,
            language,
            model,
            stream,
        }
    }

    pub fn audio(&self) -> &AudioUpload {
        &self.audio
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn stream(&self) -> bool {
        self.stream
    }
}
