//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod labels;
mod priority;
mod report_format;
mod status;

pub use labels::LabelSet;
pub use priority::Priority;
pub use report_format::ReportFormat;
pub use status::{ResultStatus, Severity};
