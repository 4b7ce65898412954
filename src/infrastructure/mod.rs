//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `targets/` - Result targets (Loki) and the config factories
//! - `email/` - Summary reporter, summary email target, outbox mailer
//! - `http` - reqwest-backed HTTP client
//! - `input` - newline-delimited JSON result reader

pub mod email;
pub mod http;
pub mod input;
pub mod targets;

// Re-export for convenience
pub use email::{JsonOutboxMailer, SummaryEmailTarget, SummaryReporter};
pub use http::ReqwestClient;
pub use targets::{loki_targets, summary_targets, LokiOptions, LokiTarget};
