//! Report entity - a rendered digest handed to the mail transport

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ReportFormat;

/// A rendered digest ready for delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub cluster_name: String,
    pub title: String,
    /// Rendered body
    pub message: String,
    pub format: ReportFormat,
}
