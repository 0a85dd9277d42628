pub mod config;
pub mod errors;
pub mod handlers;
pub mod router;
pub mod state;

pub use config::{Environment, ScaffoldConfig, Settings};
pub use errors::{ApiError, ErrorEnvelope};
pub use router::create_router;
pub use state::AppState;
