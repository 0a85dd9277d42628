use std::sync::Arc;

use crate::application::services::RelayService;
use crate::presentation::config::Settings;

/// Request-independent wiring shared by all handlers. Holds no per-request state.
#[derive(Clone)]
pub struct AppState {
    pub relay_service: Arc<RelayService>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(relay_service: Arc<RelayService>, settings: Settings) -> Self {
        Self {
            relay_service,
            settings: Arc::new(settings),
        }
    }
}
