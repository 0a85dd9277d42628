mod environment;
mod scaffold_config;
mod settings;

pub use environment::Environment;
pub use scaffold_config::ScaffoldConfig;
pub use settings::{
    LoggingSettings, ServerSettings, Settings, SettingsError, StreamingSettings, UploadSettings,
    WhisperSettings,
};
