//! Configuration type definitions

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::ports::BasicAuth;
use crate::domain::value_objects::ReportFormat;
use crate::error::RelayResult;

use super::loader::{self, ConfigWarning};

/// Dispatch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Deadline for one target to deliver one message
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Messages a target may have queued before new ones are refused
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_queue_capacity() -> usize {
    1024
}

/// Loki push target configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LokiConfig {
    #[serde(default = "default_loki_name")]
    pub name: String,

    /// Full push URL
    pub host: String,

    #[serde(default)]
    pub custom_labels: BTreeMap<String, String>,

    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,
}

impl LokiConfig {
    /// Basic auth credentials, if a username is configured
    pub fn basic_auth(&self) -> Option<BasicAuth> {
        self.username.as_ref().map(|username| BasicAuth {
            username: username.clone(),
            password: self.password.clone(),
        })
    }
}

fn default_loki_name() -> String {
    "Loki".to_string()
}

/// Summary email target configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    #[serde(default = "default_summary_name")]
    pub name: String,

    /// Directory containing `summary.html`
    #[serde(default = "default_template_dir")]
    pub template_dir: PathBuf,

    #[serde(default)]
    pub cluster_name: String,

    #[serde(default = "default_title_prefix")]
    pub title_prefix: String,

    #[serde(default)]
    pub format: ReportFormat,
}

fn default_summary_name() -> String {
    "Summary".to_string()
}

fn default_template_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_title_prefix() -> String {
    "Policy Reporter".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub dispatch: DispatchConfig,

    #[serde(default)]
    pub loki: Vec<LokiConfig>,

    #[serde(default)]
    pub summary: Vec<SummaryConfig>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> RelayResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> RelayResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Load from an explicit path, the working directory, the user config, or defaults
    pub fn discover(explicit: Option<&Path>) -> RelayResult<(Self, Vec<ConfigWarning>)> {
        loader::discover(explicit)
    }

    /// Apply environment variable overrides (POLICY_RELAY_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }

    /// Per-message dispatch deadline
    pub fn dispatch_timeout(&self) -> Duration {
        Duration::from_secs(self.dispatch.timeout_secs)
    }
}
