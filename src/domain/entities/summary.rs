//! Summary entities - per-source aggregates rendered into digest reports

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::PolicyResult;
use crate::domain::value_objects::ResultStatus;

/// Source name used for results that do not carry one
pub const UNKNOWN_SOURCE: &str = "unknown";

/// Result counters for one scope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub pass: usize,
    #[serde(default)]
    pub skip: usize,
    #[serde(default)]
    pub warn: usize,
    #[serde(default)]
    pub fail: usize,
    #[serde(default)]
    pub error: usize,
}

impl Summary {
    pub fn add(&mut self, status: ResultStatus) {
        match status {
            ResultStatus::Pass => self.pass += 1,
            ResultStatus::Skip => self.skip += 1,
            ResultStatus::Warn => self.warn += 1,
            ResultStatus::Fail => self.fail += 1,
            ResultStatus::Error => self.error += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.pass + self.skip + self.warn + self.fail + self.error
    }
}

/// Aggregated results of one policy engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    /// Results against cluster-scoped resources or without a resource
    #[serde(default)]
    pub cluster_scope: Summary,
    /// Results per namespace
    #[serde(default)]
    pub namespace_scope: BTreeMap<String, Summary>,
}

impl Source {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cluster_scope: Summary::default(),
            namespace_scope: BTreeMap::new(),
        }
    }

    /// Count a result into the matching scope
    pub fn record(&mut self, result: &PolicyResult) {
        match result.resource().filter(|r| r.is_namespaced()) {
            Some(resource) => self
                .namespace_scope
                .entry(resource.namespace.clone())
                .or_default()
                .add(result.result()),
            None => self.cluster_scope.add(result.result()),
        }
    }

    pub fn total(&self) -> usize {
        self.cluster_scope.total()
            + self
                .namespace_scope
                .values()
                .map(Summary::total)
                .sum::<usize>()
    }
}

/// Ordered collection of sources making up one digest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryBatch {
    pub sources: Vec<Source>,
}

impl SummaryBatch {
    pub fn new(sources: Vec<Source>) -> Self {
        Self { sources }
    }

    /// Aggregate results per source, in order of first appearance
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a PolicyResult>) -> Self {
        let mut sources: Vec<Source> = Vec::new();

        for result in results {
            let name = result.source().unwrap_or(UNKNOWN_SOURCE);
            let index = match sources.iter().position(|s| s.name == name) {
                Some(index) => index,
                None => {
                    sources.push(Source::new(name));
                    sources.len() - 1
                }
            };
            sources[index].record(result);
        }

        Self { sources }
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
