//! Configuration module for policy-relay
//!
//! Configuration hierarchy:
//! 1. Environment variables (POLICY_RELAY_*)
//! 2. Explicit `--config` file
//! 3. `./policy-relay.toml`
//! 4. User config (`<config dir>/policy-relay/config.toml`)
//! 5. Built-in defaults (no targets)

mod loader;
mod types;

pub use loader::{user_config_path, ConfigWarning, LOCAL_CONFIG_FILE};
pub use types::{Config, DispatchConfig, LokiConfig, SummaryConfig};
