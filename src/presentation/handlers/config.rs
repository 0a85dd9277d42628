use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct ConfigResponse {
    #[serde(rename = "max-file-size")]
    pub max_file_size: String,
    #[serde(rename = "max-request-size")]
    pub max_request_size: String,
    #[serde(rename = "default-model")]
    pub default_model: String,
    #[serde(rename = "default-language")]
    pub default_language: String,
}

/// Effective upload limits and request defaults.
pub async fn config_handler(State(state): State<AppState>) -> impl IntoResponse {
    let normalizer = state.relay_service.normalizer();
    Json(ConfigResponse {
        max_file_size: state.settings.upload.max_file_size_label(),
        max_request_size: state.settings.upload.max_request_size_label(),
        default_model: normalizer.default_model().to_string(),
        default_language: normalizer.default_language().to_string(),
    })
}
