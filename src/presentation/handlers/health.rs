use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::presentation::state::AppState;

/// Liveness of the relay itself. The engine is not contacted.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub engine: String,
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let whisper = &state.settings.whisper;
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        engine: format!(
            "{}/{}",
            whisper.base_url.trim_end_matches('/'),
            whisper.transcription_path.trim_start_matches('/')
        ),
    })
}
