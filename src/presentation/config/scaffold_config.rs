/// Serves the HTTP surface against a scripted engine instead of a real one.
///
/// Read from `SCAFFOLD_MODE` and `SCAFFOLD_FRAME_DELAY_MS`; off unless asked for.
#[derive(Debug, Clone, Default)]
pub struct ScaffoldConfig {
    pub enabled: bool,
    pub frame_delay_ms: u64,
}

const DEFAULT_FRAME_DELAY_MS: u64 = 250;

impl ScaffoldConfig {
    pub fn from_env() -> Self {
        let enabled = std::env::var("SCAFFOLD_MODE")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1"))
            .unwrap_or(false);
        let frame_delay_ms = std::env::var("SCAFFOLD_FRAME_DELAY_MS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_FRAME_DELAY_MS);

        Self {
            enabled,
            frame_delay_ms,
        }
    }
}
