use crate::presentation::config::LoggingSettings;

const DEFAULT_FILTER: &str = "info,whisper_relay=debug,tower_http=debug";

/// Configuration for tracing initialization.
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
    pub default_filter: String,
}

impl TracingConfig {
    pub fn from_settings(environment: impl Into<String>, logging: &LoggingSettings) -> Self {
        let defaults = Self::default();
        Self {
            environment: environment.into(),
            json_format: logging.enable_json || defaults.json_format,
            default_filter: if logging.level.trim().is_empty() {
                defaults.default_filter
            } else {
                format!("{},whisper_relay=debug,tower_http=debug", logging.level.trim())
            },
        }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            environment: std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "local".to_string()),
            json_format: std::env::var("LOG_FORMAT")
                .map(|v| v.to_lowercase() == "json")
                .unwrap_or(false),
            default_filter: DEFAULT_FILTER.to_string(),
        }
    }
}
