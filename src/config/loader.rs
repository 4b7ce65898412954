//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{RelayError, RelayResult};

use super::types::Config;

/// Config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "policy-relay.toml";

/// Unknown key found while loading a config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    /// Table the key appeared in (`dispatch`, `loki`, ...); empty at top level
    pub table: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}: ", self.file.display(), line)?,
            None => write!(f, "{}: ", self.file.display())?,
        }
        if self.table.is_empty() {
            write!(f, "unknown config key '{}'", self.key)?;
        } else {
            write!(f, "unknown config key '{}' in [{}]", self.key, self.table)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> RelayResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| RelayError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    validate(&config).map_err(|message| RelayError::InvalidConfig {
        file: path.to_path_buf(),
        message,
    })?;

    let warnings = unknown_paths
        .iter()
        .map(|unknown| {
            // Array indices (`loki.0.hots`) do not appear in the file.
            let mut segments: Vec<&str> = unknown
                .split('.')
                .filter(|segment| segment.parse::<usize>().is_err())
                .collect();
            let key = segments.pop().unwrap_or_default().to_string();
            let table = segments.join(".");

            ConfigWarning {
                line: find_key_line(&content, &table, &key),
                suggestion: suggest_key(&table, &key),
                key,
                table,
                file: path.to_path_buf(),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Resolve the config file to use
///
/// An explicit path must exist. Otherwise `./policy-relay.toml`, then
/// `<config dir>/policy-relay/config.toml`, then built-in defaults.
/// Environment overrides are applied in every case.
pub fn discover(explicit: Option<&Path>) -> RelayResult<(Config, Vec<ConfigWarning>)> {
    let candidate = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let local = PathBuf::from(LOCAL_CONFIG_FILE);
            if local.exists() {
                Some(local)
            } else {
                user_config_path().filter(|p| p.exists())
            }
        }
    };

    match candidate {
        Some(path) => {
            debug!(path = %path.display(), "loading configuration");
            let (config, warnings) = load_with_warnings(&path)?;
            Ok((with_env_overrides(config), warnings))
        }
        None => {
            debug!("no configuration file found, using defaults");
            Ok((with_env_overrides(Config::default()), Vec::new()))
        }
    }
}

/// Reject values that would make every target fail
fn validate(config: &Config) -> Result<(), String> {
    if config.dispatch.timeout_secs == 0 {
        return Err("dispatch.timeout_secs must be greater than zero".to_string());
    }
    if config.dispatch.queue_capacity == 0 {
        return Err("dispatch.queue_capacity must be greater than zero".to_string());
    }
    Ok(())
}

/// `<config dir>/policy-relay/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("policy-relay").join("config.toml"))
}

/// Apply environment variable overrides (POLICY_RELAY_* prefix)
pub fn with_env_overrides(mut config: Config) -> Config {
    // POLICY_RELAY_TIMEOUT_SECS
    if let Ok(timeout) = std::env::var("POLICY_RELAY_TIMEOUT_SECS") {
        if let Some(secs) = parse_timeout_override(&timeout) {
            config.dispatch.timeout_secs = secs;
        }
    }

    // POLICY_RELAY_CLUSTER_NAME
    if let Ok(cluster) = std::env::var("POLICY_RELAY_CLUSTER_NAME") {
        if !cluster.is_empty() {
            for summary in &mut config.summary {
                summary.cluster_name = cluster.clone();
            }
        }
    }

    config
}

/// Zero would expire every delivery immediately, so it is ignored
fn parse_timeout_override(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok().filter(|secs| *secs > 0)
}

/// Line of `key = ...` inside `[table]` (or `[[table]]`), 1-based
fn find_key_line(content: &str, table: &str, key: &str) -> Option<usize> {
    let mut current = "";

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if let Some(header) = line.strip_prefix('[') {
            current = header
                .trim_start_matches('[')
                .split(']')
                .next()
                .unwrap_or_default()
                .trim();
            continue;
        }

        let Some((name, _)) = line.split_once('=') else {
            continue;
        };
        if current == table && name.trim().trim_matches('"') == key {
            return Some(index + 1);
        }
    }

    None
}

/// Closest known key of the same table, if it is a likely typo
fn suggest_key(table: &str, unknown: &str) -> Option<String> {
    let known: &[&str] = match table {
        "" => &["dispatch", "loki", "summary"],
        "dispatch" => &["timeout_secs", "queue_capacity"],
        "loki" => &[
            "name",
            "host",
            "custom_labels",
            "headers",
            "username",
            "password",
        ],
        "summary" => &[
            "name",
            "template_dir",
            "cluster_name",
            "title_prefix",
            "format",
        ],
        _ => &[],
    };

    known
        .iter()
        .map(|candidate| (*candidate, edit_distance(unknown, candidate)))
        .filter(|(_, distance)| *distance <= 2)
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate.to_string())
}

/// Levenshtein distance over chars, single-row
fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = (above + 1)
                .min(row[j] + 1)
                .min(diagonal + usize::from(ca != *cb));
            diagonal = above;
        }
    }

    row[b.len()]
}
