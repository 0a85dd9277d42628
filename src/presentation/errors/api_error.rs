use std::collections::BTreeMap;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::error_envelope::ErrorEnvelope;
use crate::application::ports::TranscriptionClientError;
use crate::application::services::{RelayError, ValidationError};

pub const VALIDATION_ERROR: &str = "ValidationError";
pub const BINDING_ERROR: &str = "BindingError";
pub const FILE_TOO_LARGE: &str = "FileTooLarge";
pub const SERVICE_UNAVAILABLE: &str = "ServiceUnavailable";
pub const INTERNAL_ERROR: &str = "InternalError";

/// Every failure that can reach the HTTP boundary.
///
/// Classification into status and category is an exhaustive match, so each
/// failure maps to exactly one envelope.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{message}")]
    Binding {
        message: String,
        details: BTreeMap<String, String>,
    },
    #[error("upload exceeds the maximum allowed size of {limit}")]
    FileTooLarge { limit: String },
    #[error(transparent)]
    Downstream(#[from] TranscriptionClientError),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn binding(message: impl Into<String>) -> Self {
        Self::Binding {
            message: message.into(),
            details: BTreeMap::new(),
        }
    }

    pub fn binding_field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::Binding {
            details: BTreeMap::from([(field.to_string(), message.clone())]),
            message,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Binding { .. } => StatusCode::BAD_REQUEST,
            Self::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Downstream(error) => match error {
                TranscriptionClientError::UpstreamStatus { status, .. } => {
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
                }
                TranscriptionClientError::Unreachable(_) | TranscriptionClientError::Timeout(_) => {
                    StatusCode::BAD_GATEWAY
                }
                TranscriptionClientError::MalformedFrame(_)
                | TranscriptionClientError::InvalidRequest(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn category(&self) -> String {
        let category = match self {
            Self::Validation(_) => VALIDATION_ERROR,
            Self::Binding { .. } => BINDING_ERROR,
            Self::FileTooLarge { .. } => FILE_TOO_LARGE,
            Self::Downstream(error) => match error {
                TranscriptionClientError::UpstreamStatus { reason, .. } => return reason.clone(),
                TranscriptionClientError::Unreachable(_) | TranscriptionClientError::Timeout(_) => {
                    SERVICE_UNAVAILABLE
                }
                TranscriptionClientError::MalformedFrame(_)
                | TranscriptionClientError::InvalidRequest(_) => INTERNAL_ERROR,
            },
            Self::Internal(_) => INTERNAL_ERROR,
        };
        category.to_string()
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        let status = self.status().as_u16();
        let category = self.category();

        match self {
            Self::Validation(error) => ErrorEnvelope::new(
                status,
                category,
                "Request validation failed",
            )
            .with_details(BTreeMap::from([(
                error.field().to_string(),
                error.to_string(),
            )])),
            Self::Binding { message, details } => {
                ErrorEnvelope::new(status, category, message.clone()).with_details(details.clone())
            }
            Self::FileTooLarge { .. } => ErrorEnvelope::new(status, category, self.to_string()),
            Self::Downstream(error) => match error {
                TranscriptionClientError::UpstreamStatus {
                    status: upstream,
                    reason,
                    message,
                } => ErrorEnvelope::new(
                    status,
                    category,
                    format!(
                        "Error communicating with transcription service: {} {}: {}",
                        upstream, reason, message
                    ),
                ),
                TranscriptionClientError::Unreachable(detail)
                | TranscriptionClientError::Timeout(detail) => ErrorEnvelope::new(
                    status,
                    category,
                    format!("Unable to communicate with transcription service: {}", detail),
                ),
                TranscriptionClientError::MalformedFrame(_)
                | TranscriptionClientError::InvalidRequest(_) => {
                    ErrorEnvelope::new(status, category, "An unexpected error occurred")
                }
            },
            Self::Internal(_) => {
                ErrorEnvelope::new(status, category, "An unexpected error occurred")
            }
        }
    }

    /// Validation-type failures are the caller's fault and log at warn; the rest at error.
    pub fn log(&self) {
        let status = self.status().as_u16();
        match self {
            Self::Validation(_) | Self::Binding { .. } | Self::FileTooLarge { .. } => {
                tracing::warn!(status, category = %self.category(), error = %self, "Request rejected");
            }
            Self::Downstream(_) => {
                tracing::error!(status, category = %self.category(), error = %self, "Transcription engine failure");
            }
            Self::Internal(_) => {
                tracing::error!(status, error = %self, "Unexpected error");
            }
        }
    }
}

impl From<RelayError> for ApiError {
    fn from(error: RelayError) -> Self {
        match error {
            RelayError::Validation(e) => Self::Validation(e),
            RelayError::Downstream(e) => Self::Downstream(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        (self.status(), Json(self.envelope())).into_response()
    }
}
