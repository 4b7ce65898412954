//! Error types for policy-relay
//!
//! Uses `thiserror` for library errors. Delivery failures of a single target
//! are `TargetError`s and are reported per target by the dispatcher; this
//! type covers everything around them (configuration, I/O, input parsing).

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ports::TargetError;

/// Result type alias for policy-relay operations
pub type RelayResult<T> = Result<T, RelayError>;

/// Main error type for policy-relay operations
#[derive(Error, Debug)]
pub enum RelayError {
    /// Invalid configuration file
    #[error("invalid configuration in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// A configured target could not be built
    #[error(transparent)]
    Target(#[from] TargetError),

    /// Invalid result input
    #[error("invalid result on line {line}: {message}")]
    InvalidInput { line: usize, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
