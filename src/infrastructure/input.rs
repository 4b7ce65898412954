//! Result input
//!
//! Reads newline-delimited JSON results as produced by the upstream
//! collector. Blank lines are skipped.

use std::io::BufRead;

use crate::domain::entities::PolicyResult;
use crate::error::{RelayError, RelayResult};

pub fn read_results(reader: impl BufRead) -> RelayResult<Vec<PolicyResult>> {
    let mut results = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let result = serde_json::from_str(&line).map_err(|e| RelayError::InvalidInput {
            line: index + 1,
            message: e.to_string(),
        })?;
        results.push(result);
    }

    Ok(results)
}
