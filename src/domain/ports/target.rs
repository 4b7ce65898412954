//! Target Port
//!
//! Defines the interface every notification sink implements. A target turns
//! a domain value into its own wire format and delivers it. Targets never
//! retry; the outcome is reported to the caller.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use super::transport::TransportError;
use crate::domain::entities::{PolicyResult, SummaryBatch};

pub type TargetResult<T> = Result<T, TargetError>;

/// Whether a failed delivery may succeed if attempted again later
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network trouble, timeouts, non-2xx responses
    Transient,
    /// Broken configuration or templates; retrying will not help
    Permanent,
}

/// Error raised while building or delivering a payload
#[derive(Debug, Error)]
pub enum TargetError {
    #[error("invalid configuration for target '{target}': {message}")]
    InvalidConfig { target: String, message: String },

    #[error("failed to load template {path}: {message}")]
    Template { path: PathBuf, message: String },

    #[error("failed to render report: {message}")]
    Render { message: String },

    #[error("failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("unexpected response status {status}")]
    Status { status: u16 },

    #[error("delivery timed out after {after:?}")]
    Timeout { after: Duration },

    #[error("delivery queue for target '{target}' is full")]
    QueueFull { target: String },

    #[error("delivery worker for target '{target}' is not running")]
    Unavailable { target: String },
}

impl TargetError {
    pub fn kind(&self) -> FailureKind {
        match self {
            TargetError::InvalidConfig { .. }
            | TargetError::Template { .. }
            | TargetError::Render { .. }
            | TargetError::Serialize(_) => FailureKind::Permanent,
            TargetError::Transport(_)
            | TargetError::Status { .. }
            | TargetError::Timeout { .. }
            | TargetError::QueueFull { .. }
            | TargetError::Unavailable { .. } => FailureKind::Transient,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.kind() == FailureKind::Transient
    }
}

/// A sink receiving every result individually
pub trait Target: Send + Sync {
    /// Stable identifier used in logs and dispatch reports
    fn name(&self) -> &str;

    /// Translate and deliver one result
    fn send(&self, result: &PolicyResult) -> TargetResult<()>;
}

/// A sink receiving batched digests
pub trait SummaryTarget: Send + Sync {
    fn name(&self) -> &str;

    /// Render and deliver one digest
    fn send_summary(&self, batch: &SummaryBatch) -> TargetResult<()>;
}
