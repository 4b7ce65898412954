//! Priority value object - how urgently a result should be looked at

use serde::{Deserialize, Serialize};

/// Priority of a policy result
///
/// Variants are declared in ascending order so `Ord` follows urgency.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Debug,
    #[default]
    Info,
    Warning,
    High,
    Critical,
    Error,
}

impl Priority {
    /// Every priority, lowest first
    pub const ALL: [Priority; 6] = [
        Priority::Debug,
        Priority::Info,
        Priority::Warning,
        Priority::High,
        Priority::Critical,
        Priority::Error,
    ];

    /// Canonical lowercase name (`"high"`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Debug => "debug",
            Priority::Info => "info",
            Priority::Warning => "warning",
            Priority::High => "high",
            Priority::Critical => "critical",
            Priority::Error => "error",
        }
    }

    /// Canonical uppercase form used in labels and log lines (`"HIGH"`)
    pub fn uppercase(&self) -> &'static str {
        match self {
            Priority::Debug => "DEBUG",
            Priority::Info => "INFO",
            Priority::Warning => "WARNING",
            Priority::High => "HIGH",
            Priority::Critical => "CRITICAL",
            Priority::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
