mod config;
mod health;
mod submission;
mod transcription;

pub use config::{ConfigResponse, config_handler};
pub use health::{HealthResponse, health_handler};
pub use transcription::speech_to_text_handler;
