pub mod observability;
pub mod whisper;
