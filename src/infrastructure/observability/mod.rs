mod exchange_logging;
mod header_redaction;
mod init_tracing;
mod request_id;
mod tracing_config;

pub use exchange_logging::{
    DEFAULT_SLOW_REQUEST_THRESHOLD, Exchange, ExchangeLogger, ExchangeOutcome,
};
pub use header_redaction::redact_headers;
pub use init_tracing::init_tracing;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
pub use tracing_config::TracingConfig;
