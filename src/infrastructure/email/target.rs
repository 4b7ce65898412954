//! Summary Email Target
//!
//! Renders each digest with a `SummaryReporter` and hands the report to a
//! `Mailer`. Nothing reaches the mailer when rendering fails.

use std::sync::Arc;

use tracing::debug;

use super::summary::SummaryReporter;
use crate::domain::entities::SummaryBatch;
use crate::domain::ports::{Mailer, SummaryTarget, TargetResult};
use crate::domain::value_objects::ReportFormat;

pub struct SummaryEmailTarget {
    name: String,
    reporter: SummaryReporter,
    format: ReportFormat,
    mailer: Arc<dyn Mailer>,
}

impl SummaryEmailTarget {
    pub fn new(
        name: impl Into<String>,
        reporter: SummaryReporter,
        format: ReportFormat,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            name: name.into(),
            reporter,
            format,
            mailer,
        }
    }

    pub fn format(&self) -> ReportFormat {
        self.format
    }
}

impl SummaryTarget for SummaryEmailTarget {
    fn name(&self) -> &str {
        &self.name
    }

    fn send_summary(&self, batch: &SummaryBatch) -> TargetResult<()> {
        let report = self.reporter.report(batch, self.format)?;
        self.mailer.deliver(&report)?;

        debug!(target_name = %self.name, title = %report.title, "delivered summary report");
        Ok(())
    }
}
