use config::{Config, File};
use serde::{Deserialize, Serialize};

use super::Environment;
use crate::domain::{DEFAULT_LANGUAGE, DEFAULT_MODEL};

const BYTES_PER_MB: u64 = 1024 * 1024;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub whisper: WhisperSettings,
    pub upload: UploadSettings,
    pub streaming: StreamingSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WhisperSettings {
    pub base_url: String,
    pub transcription_path: String,
    pub default_model: String,
    pub default_language: String,
    pub connect_timeout_secs: u64,
    /// Hard limit on a whole exchange. Unset means only the transport's own limits apply.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    pub pool_max_idle_per_host: usize,
    pub max_frame_bytes: usize,
    pub slow_request_threshold_ms: u64,
    pub log_exchanges: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadSettings {
    pub max_file_size_mb: u64,
    pub max_request_size_mb: u64,
}

impl UploadSettings {
    pub fn max_file_size_bytes(&self) -> usize {
        (self.max_file_size_mb * BYTES_PER_MB) as usize
    }

    pub fn max_request_size_bytes(&self) -> usize {
        (self.max_request_size_mb.max(self.max_file_size_mb) * BYTES_PER_MB) as usize
    }

    pub fn max_file_size_label(&self) -> String {
        format!("{}MB", self.max_file_size_mb)
    }

    pub fn max_request_size_label(&self) -> String {
        format!("{}MB", self.max_request_size_mb.max(self.max_file_size_mb))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StreamingSettings {
    pub sse_keep_alive_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl Settings {
    /// Layers defaults, the optional `appsettings.<env>` file, then `APP__*`
    /// environment variables (`APP__WHISPER__BASE_URL=...`).
    pub fn load(environment: Environment) -> Result<Self, SettingsError> {
        let d = Settings::default();

        let configuration = Config::builder()
            .set_default("server.host", d.server.host)?
            .set_default("server.port", i64::from(d.server.port))?
            .set_default("whisper.base_url", d.whisper.base_url)?
            .set_default("whisper.transcription_path", d.whisper.transcription_path)?
            .set_default("whisper.default_model", d.whisper.default_model)?
            .set_default("whisper.default_language", d.whisper.default_language)?
            .set_default(
                "whisper.connect_timeout_secs",
                d.whisper.connect_timeout_secs as i64,
            )?
            .set_default(
                "whisper.pool_max_idle_per_host",
                d.whisper.pool_max_idle_per_host as i64,
            )?
            .set_default("whisper.max_frame_bytes", d.whisper.max_frame_bytes as i64)?
            .set_default(
                "whisper.slow_request_threshold_ms",
                d.whisper.slow_request_threshold_ms as i64,
            )?
            .set_default("whisper.log_exchanges", d.whisper.log_exchanges)?
            .set_default("upload.max_file_size_mb", d.upload.max_file_size_mb as i64)?
            .set_default(
                "upload.max_request_size_mb",
                d.upload.max_request_size_mb as i64,
            )?
            .set_default(
                "streaming.sse_keep_alive_seconds",
                d.streaming.sse_keep_alive_seconds as i64,
            )?
            .set_default("logging.level", d.logging.level)?
            .set_default("logging.enable_json", d.logging.enable_json)?
            .add_source(File::with_name(&environment.settings_file()).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let settings: Settings = configuration.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.whisper.base_url.trim().is_empty() {
            return Err(SettingsError::Invalid {
                key: "whisper.base_url",
                reason: "must not be empty".to_string(),
            });
        }
        if self.whisper.max_frame_bytes == 0 {
            return Err(SettingsError::Invalid {
                key: "whisper.max_frame_bytes",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.upload.max_file_size_mb == 0 {
            return Err(SettingsError::Invalid {
                key: "upload.max_file_size_mb",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            whisper: WhisperSettings {
                base_url: "http://localhost:8000".to_string(),
                transcription_path: "/v1/audio/transcriptions".to_string(),
                default_model: DEFAULT_MODEL.to_string(),
                default_language: DEFAULT_LANGUAGE.to_string(),
                connect_timeout_secs: 10,
                request_timeout_secs: None,
                pool_max_idle_per_host: 32,
                max_frame_bytes: 1024 * 1024,
                slow_request_threshold_ms: 5000,
                log_exchanges: true,
            },
            upload: UploadSettings {
                max_file_size_mb: 25,
                max_request_size_mb: 26,
            },
            streaming: StreamingSettings {
                sse_keep_alive_seconds: 15,
            },
            logging: LoggingSettings {
                level: "info".to_string(),
                enable_json: false,
            },
        }
    }
}
