//! Server configuration.
//!
//! Loaded from the first source found:
//! 1. the path in `SIGNAL_COMBINER_CONFIG`
//! 2. `config.json` in the user config directory
//!    (e.g. `~/.config/signal-combiner/config.json`)
//! 3. built-in defaults
//!
//! `SIGNAL_COMBINER_HOST`, `SIGNAL_COMBINER_PORT` and
//! `SIGNAL_COMBINER_MAX_SAMPLES` override whatever was loaded.
//!
//! ```json
//! {
//!   "host": "0.0.0.0",
//!   "port": 8080,
//!   "max_samples": 200000,
//!   "log": { "level": "debug", "format": "json" }
//! }
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dsp::processor::MAX_SAMPLE_COUNT;
use crate::logging::LogConfig;

pub const CONFIG_PATH_ENV: &str = "SIGNAL_COMBINER_CONFIG";
pub const HOST_ENV: &str = "SIGNAL_COMBINER_HOST";
pub const PORT_ENV: &str = "SIGNAL_COMBINER_PORT";
pub const MAX_SAMPLES_ENV: &str = "SIGNAL_COMBINER_MAX_SAMPLES";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Where [`ServerConfig::load`] found its settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSource {
    /// The file that was loaded; `None` means built-in defaults.
    pub file: Option<PathBuf>,
    /// `SIGNAL_COMBINER_CONFIG` was set but named a file that does not exist.
    pub missing_env_path: Option<PathBuf>,
}

impl ConfigSource {
    /// Pick the config file from the env path and the user config path.
    pub fn resolve(env_path: Option<String>, user_path: Option<PathBuf>) -> Self {
        let mut source = ConfigSource::default();
        if let Some(path) = env_path.map(PathBuf::from) {
            if path.exists() {
                source.file = Some(path);
                return source;
            }
            source.missing_env_path = Some(path);
        }
        source.file = user_path.filter(|p| p.exists());
        source
    }

    /// Problems worth surfacing to the operator.
    pub fn warnings(&self) -> Vec<String> {
        self.missing_env_path
            .iter()
            .map(|path| {
                format!(
                    "{CONFIG_PATH_ENV} points to missing file {}, ignoring it",
                    path.display()
                )
            })
            .collect()
    }

    /// Log where the config came from. Call after `init_logging`.
    pub fn report(&self) {
        for warning in self.warnings() {
            tracing::warn!("{warning}");
        }
        match &self.file {
            Some(path) => tracing::info!(path = %path.display(), "loaded config"),
            None => tracing::info!("no config file found, using defaults"),
        }
    }
}

/// Settings for the `signal-server` binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    /// 0 binds an ephemeral port.
    pub port: u16,
    /// actix worker threads; `None` uses one per physical core.
    pub workers: Option<usize>,
    /// Upper bound on `samples` accepted per request.
    pub max_samples: usize,
    pub log: LogConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: None,
            max_samples: 1_000_000,
            log: LogConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load using the search order in the module docs, apply environment
    /// overrides, and validate.
    ///
    /// This runs before the log subscriber exists, so nothing is logged
    /// here; call [`ConfigSource::report`] once logging is up.
    pub fn load() -> Result<(Self, ConfigSource), ConfigError> {
        let source = ConfigSource::resolve(
            std::env::var(CONFIG_PATH_ENV).ok(),
            Self::user_config_path(),
        );
        let mut config = match &source.file {
            Some(path) => Self::load_from(path)?,
            None => ServerConfig::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok((config, source))
    }

    /// Parse a JSON config file. Missing keys take their defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `config.json` inside the platform's user config directory.
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "signal-combiner", "signal-combiner")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Apply `SIGNAL_COMBINER_*` overrides. `lookup` maps a variable name to
    /// its value, if set.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(HOST_ENV) {
            self.host = host;
        }
        if let Some(port) = lookup(PORT_ENV) {
            self.port = port.trim().parse().map_err(|_| ConfigError::Invalid {
                key: PORT_ENV,
                message: format!("'{port}' is not a port number"),
            })?;
        }
        if let Some(max) = lookup(MAX_SAMPLES_ENV) {
            self.max_samples = max.trim().parse().map_err(|_| ConfigError::Invalid {
                key: MAX_SAMPLES_ENV,
                message: format!("'{max}' is not a sample count"),
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "host",
                message: "must not be empty".into(),
            });
        }
        if self.max_samples == 0 {
            return Err(ConfigError::Invalid {
                key: "max_samples",
                message: "must be greater than 0".into(),
            });
        }
        if self.max_samples > MAX_SAMPLE_COUNT {
            return Err(ConfigError::Invalid {
                key: "max_samples",
                message: format!("must not exceed {MAX_SAMPLE_COUNT}"),
            });
        }
        if self.workers == Some(0) {
            return Err(ConfigError::Invalid {
                key: "workers",
                message: "must be greater than 0".into(),
            });
        }
        Ok(())
    }

    /// `host:port` as passed to the listener.
    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}
