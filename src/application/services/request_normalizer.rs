use crate::domain::{AudioUpload, DEFAULT_LANGUAGE, DEFAULT_MODEL, TranscriptionRequest};

/// Inbound fields as bound from the submission, before validation.
#[derive(Debug, Clone, Default)]
pub struct RawTranscriptionRequest {
    pub file: Option<AudioUpload>,
    pub language: Option<String>,
    pub model: Option<String>,
    pub stream: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("an audio file must be provided")]
    MissingFile,
    #[error("unsupported content type '{0}': expected an audio file")]
    UnsupportedContentType(String),
}

impl ValidationError {
    /// Name of the inbound field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingFile | Self::UnsupportedContentType(_) => "file",
        }
    }
}

/// Validates the upload and substitutes defaults for optional fields.
///
/// Missing or blank optional fields are never an error; they are replaced.
#[derive(Debug, Clone)]
pub struct RequestNormalizer {
    default_language: String,
    default_model: String,
}

impl RequestNormalizer {
    pub fn new(default_language: impl Into<String>, default_model: impl Into<String>) -> Self {
        Self {
            default_language: non_blank(Some(default_language.into()))
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            default_model: non_blank(Some(default_model.into()))
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub fn normalize(
        &self,
        raw: RawTranscriptionRequest,
    ) -> Result<TranscriptionRequest, ValidationError> {
        let audio = raw.file.ok_or(ValidationError::MissingFile)?;

        if !audio.media_class().is_acceptable() {
            let declared = audio.content_type.clone().unwrap_or_default();
            return Err(ValidationError::UnsupportedContentType(declared));
        }

        let language =
            non_blank(raw.language).unwrap_or_else(|| self.default_language.clone());
        let model = non_blank(raw.model).unwrap_or_else(|| self.default_model.clone());
        let stream = raw.stream.unwrap_or(false);

        Ok(TranscriptionRequest::new(audio, language, model, stream))
    }
}

impl Default for RequestNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE, DEFAULT_MODEL)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
