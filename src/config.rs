use crate::orchestrate::OrchestratorConfig;
use crate::segment::SegmenterConfig;
use crate::transcribe::remote::RemoteConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub segmenter: SegmenterConfig,
    pub remote: RemoteConfig,
    pub orchestrator: OrchestratorConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config at {}", path.display()))?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Invalid TOML is a hard error, never silently replaced with defaults.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Self::default()
                } else {
                    panic!("Failed to load config from {}: {}", path.display(), e);
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - SCRIBA_REMOTE_URL → remote.base_url
    /// - SCRIBA_MAX_IN_FLIGHT → orchestrator.max_in_flight
    /// - SCRIBA_MAX_CHUNK_SECS → segmenter.max_chunk_secs
    /// - SCRIBA_WAIT_TIMEOUT_SECS → remote.wait_timeout_secs
    ///
    /// Empty or unparseable values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("SCRIBA_REMOTE_URL")
            && !url.is_empty()
        {
            self.remote.base_url = url;
        }

        if let Ok(value) = std::env::var("SCRIBA_MAX_IN_FLIGHT")
            && let Ok(count) = value.parse::<usize>()
            && count > 0
        {
            self.orchestrator.max_in_flight = count;
        }

        if let Ok(value) = std::env::var("SCRIBA_MAX_CHUNK_SECS")
            && let Ok(secs) = value.parse::<u64>()
            && secs > 0
        {
            self.segmenter.max_chunk_secs = secs;
        }

        if let Ok(value) = std::env::var("SCRIBA_WAIT_TIMEOUT_SECS")
            && let Ok(secs) = value.parse::<u64>()
            && secs > 0
        {
            self.remote.wait_timeout_secs = secs;
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/scriba/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("scriba")
            .join("config.toml")
    }
}
