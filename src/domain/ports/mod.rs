//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod target;
pub mod transport;

pub use target::{FailureKind, SummaryTarget, Target, TargetError, TargetResult};
pub use transport::{BasicAuth, HttpClient, HttpRequest, HttpResponse, Mailer, TransportError};
