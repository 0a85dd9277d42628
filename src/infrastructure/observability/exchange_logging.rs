//! Logging around each call to the transcription engine.
//!
//! Only the request line, status and headers are ever inspected. The response
//! body belongs to the caller's stream and is never read here, so a streaming
//! response is logged as "connection established" with no duration.

use std::time::{Duration, Instant};

use reqwest::{Method, Request, Response, Url};

use super::header_redaction::redact_headers;
use crate::infrastructure::whisper::ResponseShape;

pub const DEFAULT_SLOW_REQUEST_THRESHOLD: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy)]
pub struct ExchangeLogger {
    slow_threshold: Duration,
}

impl ExchangeLogger {
    pub fn new(slow_threshold: Duration) -> Self {
        Self { slow_threshold }
    }

    pub fn slow_threshold(&self) -> Duration {
        self.slow_threshold
    }

    /// Logs the outbound request and starts the clock for it.
    pub fn start(&self, request: &Request) -> Exchange {
        tracing::debug!(method = %request.method(), url = %request.url(), "Request");
        tracing::debug!(headers = %redact_headers(request.headers()), "Request headers");

        Exchange {
            slow_threshold: self.slow_threshold,
            method: request.method().clone(),
            url: request.url().clone(),
            started: Instant::now(),
        }
    }
}

impl Default for ExchangeLogger {
    fn default() -> Self {
        Self::new(DEFAULT_SLOW_REQUEST_THRESHOLD)
    }
}

/// An in-flight exchange started by [`ExchangeLogger::start`].
#[derive(Debug)]
pub struct Exchange {
    slow_threshold: Duration,
    method: Method,
    url: Url,
    started: Instant,
}

/// What the duration watch concluded about a completed exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeOutcome {
    Streaming,
    Completed,
    Slow,
}

impl Exchange {
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Logs status and headers of a response whose head has arrived.
    pub fn responded(self, response: &Response) -> ExchangeOutcome {
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok());
        let streaming = ResponseShape::from_content_type(content_type).is_streaming();
        let status = response.status();
        let reason = status.canonical_reason().unwrap_or("");

        if status.is_client_error() || status.is_server_error() {
            tracing::error!(
                status = status.as_u16(),
                reason = reason,
                url = %self.url,
                "Error response from transcription engine"
            );
        }

        if streaming {
            tracing::debug!(status = status.as_u16(), "Streaming response status");
            tracing::debug!(url = %self.url, "Streaming connection established");
            return ExchangeOutcome::Streaming;
        }

        tracing::debug!(status = status.as_u16(), reason = reason, "Response status");
        tracing::debug!(headers = %redact_headers(response.headers()), "Response headers");

        self.record_duration(self.elapsed())
    }

    /// Logs a transport-level failure with the time spent before it.
    pub fn failed(self, error: &dyn std::fmt::Display) {
        tracing::error!(
            method = %self.method,
            url = %self.url,
            elapsed_ms = self.elapsed().as_millis() as u64,
            error = %error,
            "Request to transcription engine failed"
        );
    }

    fn record_duration(&self, elapsed: Duration) -> ExchangeOutcome {
        let elapsed_ms = elapsed.as_millis() as u64;
        if elapsed > self.slow_threshold {
            tracing::warn!(
                method = %self.method,
                url = %self.url,
                elapsed_ms,
                "Slow request to transcription engine"
            );
            ExchangeOutcome::Slow
        } else {
            tracing::debug!(
                method = %self.method,
                url = %self.url,
                elapsed_ms,
                "Request completed"
            );
            ExchangeOutcome::Completed
        }
    }
}
