use std::pin::Pin;
use std::sync::{Arc, Mutex};

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use bytes::{Bytes, BytesMut};
use futures::stream::{Stream, StreamExt};

use crate::application::services::RawTranscriptionRequest;
use crate::domain::{AudioChunks, AudioStream, AudioUpload, UploadInterrupted};
use crate::presentation::config::UploadSettings;
use crate::presentation::errors::ApiError;

const FALLBACK_FILENAME: &str = "audio";

/// One step of reading the multipart body, in arrival order.
enum SubmissionPart {
    Text {
        name: String,
        value: String,
    },
    FileStart {
        filename: Option<String>,
        content_type: Option<String>,
    },
    FileChunk(Bytes),
    FileEnd,
}

type SubmissionParts = Pin<Box<dyn Stream<Item = Result<SubmissionPart, ApiError>> + Send>>;

/// The bound submission, plus the slot where a failure of a streamed file
/// body is parked for the handler to report.
pub(super) struct BoundSubmission {
    pub raw: RawTranscriptionRequest,
    pub upload_failure: UploadFailure,
}

/// First failure seen while piping a streamed upload to the engine.
#[derive(Clone, Default)]
pub(super) struct UploadFailure(Arc<Mutex<Option<ApiError>>>);

impl UploadFailure {
    fn record(&self, error: ApiError) {
        let mut slot = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if slot.is_none() {
            *slot = Some(error);
        }
    }

    pub(super) fn take(&self) -> Option<ApiError> {
        self.0
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }
}

/// Binds the multipart fields.
///
/// When text fields precede the file, the file body is handed on as a stream
/// and forwarded while it is still arriving; fields after it are ignored.
/// A file sent first is buffered (bounded by the per-file limit) so the
/// fields that follow it can still be bound.
pub(super) async fn bind_submission(
    multipart: Multipart,
    upload: &UploadSettings,
) -> Result<BoundSubmission, ApiError> {
    let mut parts = submission_parts(multipart, upload.clone());
    let mut raw = RawTranscriptionRequest::default();
    let upload_failure = UploadFailure::default();
    let mut fields_bound = false;

    while let Some(part) = parts.next().await {
        let (filename, content_type) = match part? {
            SubmissionPart::Text { name, value } => {
                apply_text(&mut raw, &name, value)?;
                fields_bound = true;
                continue;
            }
            SubmissionPart::FileStart {
                filename,
                content_type,
            } => (filename.filter(|f| !f.is_empty()), content_type),
            SubmissionPart::FileChunk(_) | SubmissionPart::FileEnd => continue,
        };

        let first = match parts.next().await {
            Some(Ok(SubmissionPart::FileChunk(chunk))) => chunk,
            Some(Ok(_)) | None => {
                raw.file = filename.map(|name| AudioUpload::new(name, content_type, Bytes::new()));
                continue;
            }
            Some(Err(error)) => return Err(error),
        };
        let filename = filename.unwrap_or_else(|| FALLBACK_FILENAME.to_string());

        if fields_bound {
            tracing::debug!(
                filename = %filename,
                content_type = content_type.as_deref().unwrap_or("<none>"),
                "Streaming audio upload through to the engine"
            );
            let chunks = stream_remaining(first, parts, upload_failure.clone());
            raw.file = Some(AudioUpload::streaming(
                filename,
                content_type,
                AudioStream::new(chunks),
            ));
            break;
        }

        let data = buffer_file(first, &mut parts).await?;
        tracing::debug!(
            filename = %filename,
            content_type = content_type.as_deref().unwrap_or("<none>"),
            bytes = data.len(),
            "Audio upload received"
        );
        raw.file = Some(AudioUpload::new(filename, content_type, data));
    }

    Ok(BoundSubmission {
        raw,
        upload_failure,
    })
}

/// Reads the multipart body part by part, enforcing the per-file limit while
/// the file arrives.
fn submission_parts(mut multipart: Multipart, upload: UploadSettings) -> SubmissionParts {
    Box::pin(async_stream::stream! {
        let limit = upload.max_file_size_bytes();

        loop {
            let mut field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(e) => {
                    yield Err(multipart_error(e, &upload));
                    return;
                }
            };

            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => {}
                "language" | "model" | "stream" => {
                    match field.text().await {
                        Ok(value) => {
                            yield Ok(SubmissionPart::Text { name: name.clone(), value });
                        }
                        Err(e) => {
                            yield Err(text_error(&name, e, &upload));
                            return;
                        }
                    }
                    continue;
                }
                other => {
                    tracing::debug!(field = other, "Ignoring unknown multipart field");
                    continue;
                }
            }

            yield Ok(SubmissionPart::FileStart {
                filename: field.file_name().map(str::to_string),
                content_type: field.content_type().map(str::to_string),
            });

            let mut received = 0;
            loop {
                match field.chunk().await {
                    Ok(Some(chunk)) => {
                        received += chunk.len();
                        if received > limit {
                            yield Err(ApiError::FileTooLarge {
                                limit: upload.max_file_size_label(),
                            });
                            return;
                        }
                        yield Ok(SubmissionPart::FileChunk(chunk));
                    }
                    Ok(None) => break,
                    Err(e) => {
                        yield Err(multipart_error(e, &upload));
                        return;
                    }
                }
            }
            yield Ok(SubmissionPart::FileEnd);
        }
    })
}

async fn buffer_file(first: Bytes, parts: &mut SubmissionParts) -> Result<Bytes, ApiError> {
    let mut data = BytesMut::from(first.as_ref());

    while let Some(part) = parts.next().await {
        match part? {
            SubmissionPart::FileChunk(chunk) => data.extend_from_slice(&chunk),
            SubmissionPart::FileEnd => break,
            SubmissionPart::Text { .. } | SubmissionPart::FileStart { .. } => {}
        }
    }

    Ok(data.freeze())
}

/// The rest of the file body as it arrives. A failure is parked in
/// `failure` and surfaces to the engine client as an interrupted upload.
fn stream_remaining(
    first: Bytes,
    mut parts: SubmissionParts,
    failure: UploadFailure,
) -> AudioChunks {
    Box::pin(async_stream::stream! {
        yield Ok(first);

        let mut file_done = false;
        while let Some(part) = parts.next().await {
            match part {
                Ok(SubmissionPart::FileChunk(chunk)) if !file_done => {
                    yield Ok(chunk);
                }
                Ok(SubmissionPart::FileEnd) => file_done = true,
                Ok(SubmissionPart::Text { name, .. }) => {
                    tracing::warn!(field = %name, "Ignoring field sent after a streamed file");
                }
                Ok(_) => {}
                Err(error) if file_done => {
                    tracing::warn!(error = %error, "Submission failed after the streamed file completed");
                    break;
                }
                Err(error) => {
                    let interrupted = UploadInterrupted(error.to_string());
                    failure.record(error);
                    yield Err(interrupted);
                    break;
                }
            }
        }
    })
}

fn apply_text(raw: &mut RawTranscriptionRequest, name: &str, value: String) -> Result<(), ApiError> {
    match name {
        "language" => raw.language = Some(value),
        "model" => raw.model = Some(value),
        "stream" => {
            raw.stream = Some(parse_flag(&value).ok_or_else(|| {
                ApiError::binding_field(
                    "stream",
                    format!("'{}' is not a valid boolean", value.trim()),
                )
            })?);
        }
        _ => {}
    }
    Ok(())
}

fn text_error(name: &str, error: MultipartError, upload: &UploadSettings) -> ApiError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        multipart_error(error, upload)
    } else {
        ApiError::binding_field(name, format!("could not be read as text: {}", error.body_text()))
    }
}

fn multipart_error(error: MultipartError, upload: &UploadSettings) -> ApiError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::FileTooLarge {
            limit: upload.max_request_size_label(),
        }
    } else {
        ApiError::binding(format!("Malformed multipart submission: {}", error.body_text()))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
