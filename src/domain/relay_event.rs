use super::transcript_fragment::TranscriptFragment;

/// One increment of the outgoing stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayEvent {
    pub sequence: u64,
    pub fragment: TranscriptFragment,
}

impl RelayEvent {
    pub fn new(sequence: u64, fragment: TranscriptFragment) -> Self {
        Self { sequence, fragment }
    }
}
