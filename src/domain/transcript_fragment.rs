use serde::{Deserialize, Serialize};

/// One unit of transcribed text, exactly as the engine produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptFragment {
    pub text: String,
}

impl TranscriptFragment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
