use std::any::Any;

use axum::response::{IntoResponse, Response};

use super::api_error::ApiError;

/// Turns a handler panic into the same envelope as any other internal failure.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_string()
    };

    ApiError::Internal(format!("handler panicked: {detail}")).into_response()
}
