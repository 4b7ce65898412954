//! Domain Layer
//!
//! Results, digests and the target contract, without I/O.
//!
//! ## Structure
//!
//! - `entities/` - PolicyResult, SummaryBatch, Report
//! - `value_objects/` - Priority, ResultStatus, Severity, LabelSet, ReportFormat
//! - `ports/` - Target traits and transport interfaces

pub mod entities;
pub mod ports;
pub mod value_objects;
