//! Email digests: rendering, the summary target and the outbox mailer

pub mod outbox;
pub mod summary;
pub mod target;

pub use outbox::JsonOutboxMailer;
pub use summary::{SummaryReporter, SUMMARY_TEMPLATE};
pub use target::SummaryEmailTarget;
