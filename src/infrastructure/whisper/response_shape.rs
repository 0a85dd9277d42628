/// How the engine laid out its response body, decided once per response from
/// its `Content-Type`.
///
/// The content type is the only signal available; an engine that streams
/// under a generic type will be read as a single payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `text/event-stream`: typed envelopes, payload under `data`.
    EventStream,
    /// Newline-delimited JSON: one bare payload per line.
    BareStream,
    /// One bare JSON payload making up the whole body.
    Single,
}

const BARE_STREAM_MIMES: &[&str] = &[
    "application/x-ndjson",
    "application/ndjson",
    "application/jsonl",
    "application/x-jsonlines",
    "application/stream+json",
];

impl ResponseShape {
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let essence = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase())
            .unwrap_or_default();

        if essence == "text/event-stream" {
            Self::EventStream
        } else if BARE_STREAM_MIMES.contains(&essence.as_str()) {
            Self::BareStream
        } else {
            Self::Single
        }
    }

    pub fn is_streaming(&self) -> bool {
        !matches!(self, Self::Single)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EventStream => "event-stream",
            Self::BareStream => "bare-stream",
            Self::Single => "single",
        }
    }
}
