use std::convert::Infallible;
use std::time::Duration;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use futures::stream::{Stream, StreamExt};

use super::submission::{BoundSubmission, UploadFailure, bind_submission};
use crate::application::services::FragmentStream;
use crate::domain::RelayEvent;
use crate::presentation::errors::ApiError;
use crate::presentation::state::AppState;

/// Relays an uploaded audio file to the engine and streams the transcript
/// back as server-sent events, one `{"text": ...}` object per event.
#[tracing::instrument(skip(state, multipart))]
pub async fn speech_to_text_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let multipart = multipart.map_err(|rejection| ApiError::binding(rejection.body_text()))?;
    let BoundSubmission {
        raw,
        upload_failure,
    } = bind_submission(multipart, &state.settings.upload).await?;

    let fragments = match state.relay_service.relay(raw).await {
        Ok(fragments) => fragments,
        Err(error) => return Err(upload_failure.take().unwrap_or_else(|| error.into())),
    };

    let keep_alive = Duration::from_secs(state.settings.streaming.sse_keep_alive_seconds);
    Ok(Sse::new(relay_events(fragments, upload_failure))
        .keep_alive(KeepAlive::new().interval(keep_alive).text("keep-alive"))
        .into_response())
}

/// Forwards each fragment as soon as it is adapted. A mid-stream failure
/// becomes one final `error` event; fragments already sent stand. When the
/// inbound upload broke first, that is the failure reported.
fn relay_events(
    mut fragments: FragmentStream,
    upload_failure: UploadFailure,
) -> impl Stream<Item = Result<Event, Infallible>> {
    async_stream::stream! {
        let mut sequence: u64 = 0;

        while let Some(item) = fragments.next().await {
            match item {
                Ok(fragment) => {
                    let event = RelayEvent::new(sequence, fragment);
                    sequence += 1;
                    let data = serde_json::to_string(&event.fragment).unwrap_or_default();
                    yield Ok(Event::default().id(event.sequence.to_string()).data(data));
                }
                Err(e) => {
                    let error = upload_failure.take().unwrap_or_else(|| ApiError::from(e));
                    error.log();
                    let data = serde_json::to_string(&error.envelope()).unwrap_or_default();
                    yield Ok(Event::default().event("error").data(data));
                    tracing::warn!(fragments = sequence, "Relay stream terminated by downstream failure");
                    return;
                }
            }
        }

        tracing::info!(fragments = sequence, "Relay stream completed");
    }
}
