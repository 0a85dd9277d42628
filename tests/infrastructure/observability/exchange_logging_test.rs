use std::time::Duration;

use futures::stream::StreamExt;
use tracing::Level;
use whisper_relay::application::ports::{DownstreamFrame, TranscriptionClient};
use whisper_relay::application::services::{RawTranscriptionRequest, RequestNormalizer};
use whisper_relay::domain::AudioUpload;
use whisper_relay::infrastructure::observability::{ExchangeLogger, ExchangeOutcome};
use whisper_relay::infrastructure::whisper::FasterWhisperClient;
use whisper_relay::presentation::Settings;
use whisper_relay::presentation::config::WhisperSettings;

use crate::helpers::mock_engine::{EngineReply, start_mock_engine};
use crate::helpers::multipart::wav_bytes;

fn outbound_request() -> reqwest::Request {
    reqwest::Client::new()
        .post("http://engine.local/v1/audio/transcriptions")
        .header("authorization", "Bearer hidden")
        .build()
        .unwrap()
}

fn response(content_type: &str, body: &'static str) -> reqwest::Response {
    axum::http::Response::builder()
        .status(200)
        .header("content-type", content_type)
        .body(body)
        .unwrap()
        .into()
}

#[tokio::test]
async fn given_streaming_response_when_logging_then_body_is_left_for_the_caller() {
    let exchange = ExchangeLogger::default().start(&outbound_request());
    let response = response("text/event-stream", "data: {\"text\":\"a\"}\n\n");

    let outcome = exchange.responded(&response);

    assert_eq!(outcome, ExchangeOutcome::Streaming);
    assert_eq!(
        response.text().await.unwrap(),
        "data: {\"text\":\"a\"}\n\n"
    );
}

#[tokio::test]
async fn given_fast_json_response_when_logging_then_exchange_is_completed() {
    let exchange = ExchangeLogger::new(Duration::from_secs(60)).start(&outbound_request());
    let response = response("application/json", r#"{"text":"done"}"#);

    let outcome = exchange.responded(&response);

    assert_eq!(outcome, ExchangeOutcome::Completed);
    assert_eq!(response.text().await.unwrap(), r#"{"text":"done"}"#);
}

#[test]
fn given_response_slower_than_threshold_when_logging_then_exchange_is_slow() {
    let exchange = ExchangeLogger::new(Duration::from_millis(1)).start(&outbound_request());
    std::thread::sleep(Duration::from_millis(5));

    let outcome = exchange.responded(&response("application/json", "{}"));

    assert_eq!(outcome, ExchangeOutcome::Slow);
}

async fn transcribe_with(logger: Option<ExchangeLogger>, base_url: &str) -> Vec<DownstreamFrame> {
    let settings = WhisperSettings {
        base_url: base_url.to_string(),
        ..Settings::default().whisper
    };
    let client = FasterWhisperClient::new(&settings)
        .unwrap()
        .with_exchange_logger(logger);
    let request = RequestNormalizer::default()
        .normalize(RawTranscriptionRequest {
            file: Some(AudioUpload::new(
                "sample.wav",
                Some("audio/wav".to_string()),
                wav_bytes().into(),
            )),
            ..Default::default()
        })
        .unwrap();

    client
        .transcribe(&request)
        .await
        .unwrap()
        .map(Result::unwrap)
        .collect()
        .await
}

#[tokio::test]
async fn given_debug_logging_when_streaming_then_fragments_match_unlogged_run() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let engine = start_mock_engine(EngineReply::chunks(
        "text/event-stream",
        vec!["data: {\"text\":\"one\"}\n\n", "data: {\"text\":\"two\"}\n\n"],
    ))
    .await;

    let logged = transcribe_with(Some(ExchangeLogger::default()), &engine.base_url).await;
    let unlogged = transcribe_with(None, &engine.base_url).await;

    assert_eq!(logged.len(), 2);
    assert_eq!(logged, unlogged);
}
