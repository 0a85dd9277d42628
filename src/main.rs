use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use whisper_relay::application::ports::TranscriptionClient;
use whisper_relay::application::services::{RelayService, RequestNormalizer};
use whisper_relay::infrastructure::observability::{TracingConfig, init_tracing};
use whisper_relay::infrastructure::whisper::{FasterWhisperClient, MockTranscriptionClient};
use whisper_relay::presentation::{AppState, Environment, ScaffoldConfig, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(&TracingConfig::from_settings(
        environment.as_str(),
        &settings.logging,
    ))
    .context("Failed to initialize tracing")?;

    let scaffold = ScaffoldConfig::from_env();
    let client: Arc<dyn TranscriptionClient> = if scaffold.enabled {
        tracing::warn!("Scaffold mode enabled, transcripts are scripted");
        Arc::new(MockTranscriptionClient::scaffold(scaffold.frame_delay_ms))
    } else {
        let client = FasterWhisperClient::new(&settings.whisper)
            .context("Failed to build transcription client")?;
        tracing::info!(endpoint = client.endpoint(), "Transcription engine configured");
        Arc::new(client)
    };

    let normalizer = RequestNormalizer::new(
        settings.whisper.default_language.clone(),
        settings.whisper.default_model.clone(),
    );
    let relay_service = Arc::new(RelayService::new(normalizer, client));

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server host/port")?;

    let router = create_router(AppState::new(relay_service, settings));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
