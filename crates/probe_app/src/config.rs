//! Run configuration for the probe CLI.
//!
//! Read from a RON file (default `probe.ron`). A missing file means defaults;
//! a malformed one is an error. Command-line flags and their environment
//! variables override the file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use probe_core::{Backoff, PollPolicy, TriggerRequest};
use probe_engine::{HttpSettings, StoreSettings};
use probe_logging::probe_info;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid target {project_id}: empty language")]
    EmptyTarget { project_id: i64 },
    #[error("invalid backoff factor {factor}: expected a number between 1 and 16")]
    InvalidBackoff { factor: f64 },
}

/// Largest accepted growth factor for exponential polling.
pub const MAX_BACKOFF_FACTOR: f64 = 16.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum BackoffConfig {
    Fixed,
    Exponential { factor: f64, max_interval_millis: u64 },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub deadline_secs: u64,
    pub interval_millis: u64,
    pub backoff: BackoffConfig,
    pub early_exit: bool,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            deadline_secs: 15,
            interval_millis: 1000,
            backoff: BackoffConfig::Fixed,
            early_exit: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TargetConfig {
    pub project_id: i64,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub backend_url: String,
    pub parser_url: String,
    pub database_url: String,
    pub company_id: i64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub poll: PollConfig,
    pub pause_between_items_millis: u64,
    pub recent_entries: u32,
    pub targets: Vec<TargetConfig>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8081".to_string(),
            parser_url: "http://localhost:5000".to_string(),
            database_url: "mysql://root@localhost:3306/kulin".to_string(),
            company_id: 1,
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            poll: PollConfig::default(),
            pause_between_items_millis: 2000,
            recent_entries: 5,
            targets: Vec::new(),
        }
    }
}

/// Values given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub backend_url: Option<String>,
    pub parser_url: Option<String>,
    pub database_url: Option<String>,
    pub deadline_secs: Option<u64>,
    pub early_exit: bool,
}

impl ProbeConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                probe_info!("No config at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config = Self::from_ron(&content).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that parse but cannot drive a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let BackoffConfig::Exponential { factor, .. } = self.poll.backoff {
            if !factor.is_finite() || !(1.0..=MAX_BACKOFF_FACTOR).contains(&factor) {
                return Err(ConfigError::InvalidBackoff { factor });
            }
        }
        Ok(())
    }

    fn from_ron(content: &str) -> Result<Self, String> {
        ron::from_str(content).map_err(|err| err.to_string())
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(url) = overrides.backend_url {
            self.backend_url = url;
        }
        if let Some(url) = overrides.parser_url {
            self.parser_url = url;
        }
        if let Some(url) = overrides.database_url {
            self.database_url = url;
        }
        if let Some(secs) = overrides.deadline_secs {
            self.poll.deadline_secs = secs;
        }
        self.poll.early_exit |= overrides.early_exit;
    }

    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            acquire_timeout: Duration::from_secs(self.connect_timeout_secs),
            ..StoreSettings::new(self.database_url.clone())
        }
    }

    pub fn poll_policy(&self) -> PollPolicy {
        let backoff = match self.poll.backoff {
            BackoffConfig::Fixed => Backoff::Fixed,
            BackoffConfig::Exponential {
                factor,
                max_interval_millis,
            } => Backoff::Exponential {
                factor,
                max_interval: Duration::from_millis(max_interval_millis),
            },
        };
        PollPolicy {
            deadline: Duration::from_secs(self.poll.deadline_secs),
            interval: Duration::from_millis(self.poll.interval_millis),
            backoff,
            early_exit: self.poll.early_exit,
        }
    }

    pub fn pause_between_items(&self) -> Duration {
        Duration::from_millis(self.pause_between_items_millis)
    }

    pub fn targets(&self) -> Result<Vec<TriggerRequest>, ConfigError> {
        self.targets
            .iter()
            .map(|target| {
                if target.language.trim().is_empty() {
                    return Err(ConfigError::EmptyTarget {
                        project_id: target.project_id,
                    });
                }
                Ok(TriggerRequest::new(
                    target.project_id,
                    target.language.as_str(),
                ))
            })
            .collect()
    }
}
