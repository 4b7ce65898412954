//! policy-relay - fan-out of policy evaluation results
//!
//! Policy engines produce one result per rule check. policy-relay turns each
//! result into the wire format of every configured target (Loki streams,
//! summary email digests, ...) and delivers it, isolating targets from each
//! other's failures and slowness.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{DispatchOptions, DispatchReport, Dispatcher, TargetOutcome};
pub use config::{Config, ConfigWarning};
pub use domain::entities::{PolicyResult, Report, Resource, Source, Summary, SummaryBatch};
pub use domain::ports::{
    FailureKind, HttpClient, Mailer, SummaryTarget, Target, TargetError, TargetResult,
};
pub use domain::value_objects::{LabelSet, Priority, ReportFormat, ResultStatus, Severity};
pub use error::{RelayError, RelayResult};
pub use infrastructure::{
    JsonOutboxMailer, LokiOptions, LokiTarget, ReqwestClient, SummaryEmailTarget, SummaryReporter,
};
