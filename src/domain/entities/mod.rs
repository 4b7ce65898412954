//! Domain Entities
//!
//! - `PolicyResult` - One policy rule check against a resource
//! - `SummaryBatch` - Per-source aggregates for digest reports
//! - `Report` - A rendered digest

mod policy_result;
mod report;
mod summary;

pub use policy_result::{PolicyResult, Resource};
pub use report::Report;
pub use summary::{Source, Summary, SummaryBatch, UNKNOWN_SOURCE};
