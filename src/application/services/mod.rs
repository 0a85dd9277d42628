mod relay_service;
mod request_normalizer;
mod response_adapter;

pub use relay_service::{RelayError, RelayService};
pub use request_normalizer::{RawTranscriptionRequest, RequestNormalizer, ValidationError};
pub use response_adapter::{FragmentStream, ResponseAdapter};
