//! Configured targets
//!
//! Builds target instances from configuration. Every target implements a
//! port from the domain layer; adding a sink means adding a module here, the
//! dispatcher does not change.

pub mod loki;

pub use loki::{LokiOptions, LokiTarget};

use std::sync::Arc;

use crate::config::Config;
use crate::domain::ports::{HttpClient, Mailer, SummaryTarget, Target, TargetResult};
use crate::infrastructure::email::{SummaryEmailTarget, SummaryReporter};

/// Build every configured Loki target
pub fn loki_targets(
    config: &Config,
    client: Arc<dyn HttpClient>,
) -> TargetResult<Vec<Arc<dyn Target>>> {
    config
        .loki
        .iter()
        .map(|loki| -> TargetResult<Arc<dyn Target>> {
            let mut options = LokiOptions::new(loki.name.as_str(), loki.host.as_str(), client.clone());
            options.custom_labels = loki.custom_labels.clone();
            options.headers = loki.headers.clone();
            options.basic_auth = loki.basic_auth();

            Ok(Arc::new(LokiTarget::new(options)?))
        })
        .collect()
}

/// Build every configured summary email target
///
/// Templates are loaded here, so a missing template fails at startup.
pub fn summary_targets(
    config: &Config,
    mailer: Arc<dyn Mailer>,
) -> TargetResult<Vec<Arc<dyn SummaryTarget>>> {
    config
        .summary
        .iter()
        .map(|summary| -> TargetResult<Arc<dyn SummaryTarget>> {
            let reporter = SummaryReporter::new(
                &summary.template_dir,
                summary.cluster_name.as_str(),
                summary.title_prefix.as_str(),
            )?;

            Ok(Arc::new(SummaryEmailTarget::new(
                summary.name.as_str(),
                reporter,
                summary.format,
                mailer.clone(),
            )))
        })
        .collect()
}
