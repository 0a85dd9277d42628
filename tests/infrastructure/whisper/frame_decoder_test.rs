use std::time::Duration;

use bytes::Bytes;
use futures::stream::{self, StreamExt};
use whisper_relay::application::ports::{
    DownstreamFrame, EventEnvelope, TranscriptionClientError,
};
use whisper_relay::domain::TranscriptFragment;
use whisper_relay::infrastructure::whisper::{FrameDecoder, ResponseShape};

const MAX_FRAME: usize = 1024;

type Decoded = Vec<Result<DownstreamFrame, TranscriptionClientError>>;

async fn decode(shape: ResponseShape, chunks: &[&'static str]) -> Decoded {
    let body = stream::iter(
        chunks
            .iter()
            .map(|c| Ok(Bytes::from_static(c.as_bytes())))
            .collect::<Vec<_>>(),
    );
    FrameDecoder::new(shape, MAX_FRAME).decode(body).collect().await
}

fn envelope(text: &str) -> DownstreamFrame {
    DownstreamFrame::Envelope(EventEnvelope::with_data(TranscriptFragment::new(text)))
}

fn bare(text: &str) -> DownstreamFrame {
    DownstreamFrame::Bare(TranscriptFragment::new(text))
}

fn frames(decoded: Decoded) -> Vec<DownstreamFrame> {
    decoded.into_iter().map(Result::unwrap).collect()
}

#[tokio::test]
async fn given_event_split_across_chunks_when_decoding_then_it_is_reassembled() {
    let decoded = decode(
        ResponseShape::EventStream,
        &["da", "ta: {\"text\":\"Ho", "la\"}\n", "\ndata: {\"text\":\"!\"}\n\n"],
    )
    .await;

    assert_eq!(frames(decoded), vec![envelope("Hola"), envelope("!")]);
}

#[tokio::test]
async fn given_event_with_type_and_id_when_decoding_then_envelope_keeps_them() {
    let decoded = decode(
        ResponseShape::EventStream,
        &["event: transcript\nid: 7\ndata: {\"text\":\"hi\"}\n\n"],
    )
    .await;

    assert_eq!(
        frames(decoded),
        vec![DownstreamFrame::Envelope(EventEnvelope {
            event: Some("transcript".to_string()),
            id: Some("7".to_string()),
            data: Some(TranscriptFragment::new("hi")),
        })]
    );
}

#[tokio::test]
async fn given_payload_less_event_when_decoding_then_yields_empty_envelope() {
    let decoded = decode(
        ResponseShape::EventStream,
        &["event: ping\n\ndata: [DONE]\n\n"],
    )
    .await;

    let frames = frames(decoded);
    assert_eq!(frames.len(), 2);
    for frame in frames {
        match frame {
            DownstreamFrame::Envelope(envelope) => assert!(envelope.data.is_none()),
            other => panic!("expected envelope, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn given_comment_lines_when_decoding_then_they_are_ignored() {
    let decoded = decode(
        ResponseShape::EventStream,
        &[": keep-alive\n\n", "data: {\"text\":\"a\"}\n\n"],
    )
    .await;

    assert_eq!(frames(decoded), vec![envelope("a")]);
}

#[tokio::test]
async fn given_crlf_line_endings_when_decoding_then_frames_are_parsed() {
    let decoded = decode(
        ResponseShape::EventStream,
        &["data: {\"text\":\"a\"}\r\n\r\n"],
    )
    .await;

    assert_eq!(frames(decoded), vec![envelope("a")]);
}

#[tokio::test]
async fn given_multi_line_data_when_decoding_then_lines_are_joined() {
    let decoded = decode(
        ResponseShape::EventStream,
        &["data: {\"text\":\ndata: \"joined\"}\n\n"],
    )
    .await;

    assert_eq!(frames(decoded), vec![envelope("joined")]);
}

#[tokio::test]
async fn given_event_without_trailing_blank_line_when_body_ends_then_it_is_flushed() {
    let decoded = decode(ResponseShape::EventStream, &["data: {\"text\":\"tail\"}"]).await;

    assert_eq!(frames(decoded), vec![envelope("tail")]);
}

#[tokio::test]
async fn given_ndjson_lines_when_decoding_then_each_line_is_a_bare_frame() {
    let decoded = decode(
        ResponseShape::BareStream,
        &["{\"text\":\"Hola\"}\n{\"te", "xt\":\", \"}\n\n{\"text\":\"mundo!\"}"],
    )
    .await;

    assert_eq!(
        frames(decoded),
        vec![bare("Hola"), bare(", "), bare("mundo!")]
    );
}

#[tokio::test]
async fn given_single_json_body_when_decoding_then_yields_one_bare_frame() {
    let decoded = decode(
        ResponseShape::Single,
        &["{\"text\":", "\"whole transcript\"}"],
    )
    .await;

    assert_eq!(frames(decoded), vec![bare("whole transcript")]);
}

#[tokio::test]
async fn given_empty_single_body_when_decoding_then_fails_with_malformed_frame() {
    let decoded = decode(ResponseShape::Single, &[]).await;

    assert_eq!(decoded.len(), 1);
    assert!(matches!(
        decoded[0],
        Err(TranscriptionClientError::MalformedFrame(_))
    ));
}

#[tokio::test]
async fn given_invalid_json_after_valid_frame_when_decoding_then_stream_ends_with_error() {
    let decoded = decode(
        ResponseShape::BareStream,
        &["{\"text\":\"ok\"}\nnot json\n{\"text\":\"unreached\"}\n"],
    )
    .await;

    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded[0], Ok(bare("ok")));
    assert!(matches!(
        decoded[1],
        Err(TranscriptionClientError::MalformedFrame(_))
    ));
}

#[tokio::test]
async fn given_frame_larger_than_limit_when_decoding_then_fails_instead_of_buffering() {
    let oversized: &'static str =
        Box::leak(format!("{{\"text\":\"{}", "x".repeat(MAX_FRAME)).into_boxed_str());

    let decoded = decode(ResponseShape::BareStream, &[oversized, "\"}\n"]).await;

    assert_eq!(decoded.len(), 1);
    assert!(matches!(
        decoded[0],
        Err(TranscriptionClientError::MalformedFrame(_))
    ));
}

#[tokio::test]
async fn given_transport_error_mid_body_when_decoding_then_error_is_forwarded() {
    let body = stream::iter(vec![
        Ok(Bytes::from_static(b"{\"text\":\"a\"}\n")),
        Err(TranscriptionClientError::Unreachable("reset".to_string())),
        Ok(Bytes::from_static(b"{\"text\":\"b\"}\n")),
    ]);

    let decoded: Decoded = FrameDecoder::new(ResponseShape::BareStream, MAX_FRAME)
        .decode(body)
        .collect()
        .await;

    assert_eq!(
        decoded,
        vec![
            Ok(bare("a")),
            Err(TranscriptionClientError::Unreachable("reset".to_string()))
        ]
    );
}

#[tokio::test]
async fn given_open_body_when_first_frame_is_complete_then_it_is_yielded_immediately() {
    let body = stream::iter(vec![Ok(Bytes::from_static(b"data: {\"text\":\"early\"}\n\n"))])
        .chain(stream::pending());

    let mut decoded = FrameDecoder::new(ResponseShape::EventStream, MAX_FRAME).decode(body);
    let first = tokio::time::timeout(Duration::from_secs(1), decoded.next())
        .await
        .expect("first frame should not wait for the body to end");

    assert_eq!(first, Some(Ok(envelope("early"))));
}

#[tokio::test]
async fn given_null_event_payload_between_fragments_when_decoding_then_it_is_a_heartbeat() {
    let decoded = decode(
        ResponseShape::EventStream,
        &[
            "data: {\"text\":\"Hola\"}\n\n",
            "data: null\n\n",
            "data: {\"text\":\"mundo\"}\n\n",
        ],
    )
    .await;

    assert_eq!(
        frames(decoded),
        vec![
            envelope("Hola"),
            DownstreamFrame::Envelope(EventEnvelope::heartbeat()),
            envelope("mundo"),
        ]
    );
}

#[tokio::test]
async fn given_null_line_between_ndjson_fragments_when_decoding_then_it_is_skipped() {
    let decoded = decode(
        ResponseShape::BareStream,
        &["{\"text\":\"Hola\"}\n", "null\n", "{\"text\":\"mundo\"}\n"],
    )
    .await;

    assert_eq!(frames(decoded), vec![bare("Hola"), bare("mundo")]);
}

#[tokio::test]
async fn given_body_delivered_one_byte_at_a_time_when_decoding_then_frames_are_unchanged() {
    let raw = "event: transcript\ndata: {\"text\":\"Hola\"}\r\n\r\ndata: {\"text\":\"mundo\"}\n\n";
    let body = stream::iter(
        raw.as_bytes()
            .iter()
            .map(|b| Ok(Bytes::copy_from_slice(&[*b])))
            .collect::<Vec<_>>(),
    );

    let decoded: Decoded = FrameDecoder::new(ResponseShape::EventStream, MAX_FRAME)
        .decode(body)
        .collect()
        .await;

    assert_eq!(
        frames(decoded),
        vec![
            DownstreamFrame::Envelope(EventEnvelope {
                event: Some("transcript".to_string()),
                id: None,
                data: Some(TranscriptFragment::new("Hola")),
            }),
            envelope("mundo"),
        ]
    );
}

#[tokio::test]
async fn given_ndjson_split_across_many_chunks_when_decoding_then_lines_are_found_once_complete() {
    let line = "{\"text\":\"a long fragment split into many small pieces\"}\n";
    let chunks: Vec<_> = line
        .as_bytes()
        .chunks(3)
        .map(|c| Ok(Bytes::copy_from_slice(c)))
        .chain(std::iter::once(Ok(Bytes::from_static(b"{\"text\":\"next\"}\n"))))
        .collect();

    let decoded: Decoded = FrameDecoder::new(ResponseShape::BareStream, MAX_FRAME)
        .decode(stream::iter(chunks))
        .collect()
        .await;

    assert_eq!(
        frames(decoded),
        vec![
            bare("a long fragment split into many small pieces"),
            bare("next")
        ]
    );
}

#[tokio::test]
async fn given_single_null_body_when_decoding_then_no_frame_is_produced() {
    let decoded = decode(ResponseShape::Single, &["null"]).await;

    assert!(decoded.is_empty());
}
