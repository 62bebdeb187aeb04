use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use flashdeck_engine::{EngineConfig, Routes};
use flashdeck_logging::{LogDestination, DEFAULT_LOG_FILE};
use serde::{Deserialize, Serialize};

pub(crate) const CONFIG_FILENAME: &str = "flashdeck.ron";

#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum LogTarget {
    File,
    Terminal,
    Both,
    Off,
}

/// Settings read from `flashdeck.ron`. Missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub server_url: String,
    pub poll_interval_ms: u64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub upload_route: String,
    pub progress_route: String,
    pub generate_route: String,
    pub log: LogTarget,
    pub log_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            server_url: engine.base_url,
            poll_interval_ms: engine.poll_interval.as_millis() as u64,
            connect_timeout_secs: engine.connect_timeout.as_secs(),
            request_timeout_secs: engine.request_timeout.as_secs(),
            upload_route: engine.routes.upload,
            progress_route: engine.routes.progress,
            generate_route: engine.routes.generate,
            log: LogTarget::File,
            log_file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

impl AppConfig {
    pub(crate) fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            base_url: self.server_url.clone(),
            poll_interval: Duration::from_millis(self.poll_interval_ms.max(1)),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            routes: Routes {
                upload: self.upload_route.clone(),
                progress: self.progress_route.clone(),
                generate: self.generate_route.clone(),
            },
        }
    }

    pub(crate) fn log_destination(&self) -> LogDestination {
        let file = PathBuf::from(&self.log_file);
        match self.log {
            LogTarget::File => LogDestination::File(file),
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both(file),
            LogTarget::Off => LogDestination::Off,
        }
    }
}

/// Loads the config file. A missing file is not an error.
pub(crate) fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(AppConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
