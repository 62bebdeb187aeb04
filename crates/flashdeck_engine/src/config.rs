use std::time::Duration;

/// Reference polling interval for job progress.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Server paths, relative to `EngineConfig::base_url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    pub upload: String,
    /// The job id is appended as a final path segment.
    pub progress: String,
    pub generate: String,
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            upload: "/upload".to_string(),
            progress: "/progress".to_string(),
            generate: "/generate_flashcards".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub base_url: String,
    pub poll_interval: Duration,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub routes: Routes,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            routes: Routes::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}
