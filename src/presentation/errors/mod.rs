mod api_error;
mod error_envelope;
mod panic_response;

pub use api_error::{
    ApiError, BINDING_ERROR, FILE_TOO_LARGE, INTERNAL_ERROR, SERVICE_UNAVAILABLE,
    VALIDATION_ERROR,
};
pub use error_envelope::ErrorEnvelope;
pub use panic_response::panic_response;
