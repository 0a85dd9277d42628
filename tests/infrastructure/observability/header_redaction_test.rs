use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, HeaderMap, HeaderValue};
use whisper_relay::infrastructure::observability::redact_headers;

#[test]
fn given_credential_headers_when_redacting_then_values_are_masked() {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer secret-token"));
    headers.insert(COOKIE, HeaderValue::from_static("session=abc"));
    headers.insert("x-api-key", HeaderValue::from_static("k-123"));

    let rendered = redact_headers(&headers);

    assert!(!rendered.contains("secret-token"));
    assert!(!rendered.contains("session=abc"));
    assert!(!rendered.contains("k-123"));
    assert!(rendered.contains("authorization: [REDACTED]"));
}

#[test]
fn given_ordinary_headers_when_redacting_then_values_are_shown() {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/event-stream"));

    assert_eq!(
        redact_headers(&headers),
        "[content-type: text/event-stream]"
    );
}
