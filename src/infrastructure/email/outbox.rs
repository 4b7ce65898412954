//! JSON Outbox Mailer
//!
//! Writes each report as one JSON line, for pipelines where another process
//! owns SMTP delivery.

use std::io::{self, Write};
use std::sync::Mutex;

use crate::domain::entities::Report;
use crate::domain::ports::{Mailer, TransportError};

pub struct JsonOutboxMailer {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonOutboxMailer {
    /// Outbox writing to stdout
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }
}

impl Mailer for JsonOutboxMailer {
    fn deliver(&self, report: &Report) -> Result<(), TransportError> {
        let line = serde_json::to_string(report)
            .map_err(|e| TransportError::new(format!("failed to encode report: {}", e)))?;

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| TransportError::new("outbox writer poisoned"))?;
        writeln!(writer, "{}", line)
            .and_then(|_| writer.flush())
            .map_err(|e| TransportError::new(format!("failed to write report: {}", e)))
    }
}
