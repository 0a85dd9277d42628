/// Coarse classification of a declared upload content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaClass {
    /// `audio/*`, or a container type that only ever carries audio.
    Audio,
    /// Generic binary such as `application/octet-stream`.
    Opaque,
    /// No content type was declared.
    Unspecified,
    /// Anything recognisably not audio (`text/*`, `image/*`, `application/json`, ...).
    NonAudio,
}

const AUDIO_CONTAINER_MIMES: &[&str] = &["application/ogg", "application/x-flac"];

const OPAQUE_MIMES: &[&str] = &[
    "application/octet-stream",
    "binary/octet-stream",
    "application/binary",
    "application/unknown",
];

impl MediaClass {
    pub fn from_mime(mime: Option<&str>) -> Self {
        let essence = match mime.map(essence_of) {
            Some(e) if !e.is_empty() => e,
            _ => return Self::Unspecified,
        };

        if essence.starts_with("audio/") || AUDIO_CONTAINER_MIMES.contains(&essence.as_str()) {
            Self::Audio
        } else if OPAQUE_MIMES.contains(&essence.as_str()) {
            Self::Opaque
        } else {
            Self::NonAudio
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Opaque => "opaque",
            Self::Unspecified => "unspecified",
            Self::NonAudio => "non-audio",
        }
    }

    pub fn is_acceptable(&self) -> bool {
        !matches!(self, Self::NonAudio)
    }
}

/// Lower-cased `type/subtype` with parameters stripped.
fn essence_of(mime: &str) -> String {
    mime.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
