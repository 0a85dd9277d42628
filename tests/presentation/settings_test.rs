use whisper_relay::presentation::config::{Settings, SettingsError};
use whisper_relay::presentation::Environment;

#[test]
fn given_defaults_when_created_then_values_match_documented_defaults() {
    let settings = Settings::default();

    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.whisper.base_url, "http://localhost:8000");
    assert_eq!(settings.whisper.transcription_path, "/v1/audio/transcriptions");
    assert_eq!(settings.whisper.default_language, "en");
    assert_eq!(settings.whisper.default_model, "Systran/faster-whisper-small");
    assert_eq!(settings.whisper.request_timeout_secs, None);
    assert_eq!(settings.upload.max_file_size_mb, 25);
    assert_eq!(settings.streaming.sse_keep_alive_seconds, 15);
    assert!(settings.validate().is_ok());
}

#[test]
fn given_no_settings_file_when_loading_then_defaults_apply() {
    let settings = Settings::load(Environment::Test).unwrap();

    assert_eq!(settings.whisper.transcription_path, "/v1/audio/transcriptions");
    assert_eq!(settings.upload.max_file_size_mb, 25);
}

#[test]
fn given_upload_limits_when_computing_bytes_then_request_limit_covers_file_limit() {
    let mut settings = Settings::default();
    settings.upload.max_file_size_mb = 30;
    settings.upload.max_request_size_mb = 10;

    assert_eq!(settings.upload.max_file_size_bytes(), 30 * 1024 * 1024);
    assert_eq!(settings.upload.max_request_size_bytes(), 30 * 1024 * 1024);
    assert_eq!(settings.upload.max_file_size_label(), "30MB");
}

#[test]
fn given_empty_base_url_when_validating_then_returns_invalid_setting() {
    let mut settings = Settings::default();
    settings.whisper.base_url = "  ".to_string();

    assert!(matches!(
        settings.validate(),
        Err(SettingsError::Invalid {
            key: "whisper.base_url",
            ..
        })
    ));
}

#[test]
fn given_zero_frame_limit_when_validating_then_returns_invalid_setting() {
    let mut settings = Settings::default();
    settings.whisper.max_frame_bytes = 0;

    assert!(settings.validate().is_err());
}
