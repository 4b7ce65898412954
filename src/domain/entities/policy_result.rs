//! PolicyResult entity - one rule check against one resource
//!
//! Results are produced upstream by the policy engine watcher and are never
//! mutated by targets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Priority, ResultStatus, Severity};

/// The resource a result was evaluated against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub kind: String,
    pub name: String,
    /// Empty for cluster-scoped resources
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub uid: String,
}

impl Resource {
    pub fn new(
        kind: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
        uid: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            namespace: namespace.into(),
            uid: uid.into(),
        }
    }

    /// Cluster-scoped resource (no namespace)
    pub fn cluster_scoped(
        kind: impl Into<String>,
        name: impl Into<String>,
        uid: impl Into<String>,
    ) -> Self {
        Self::new(kind, name, "", uid)
    }

    pub fn is_namespaced(&self) -> bool {
        !self.namespace.is_empty()
    }
}

/// A single policy evaluation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyResult {
    policy: String,
    #[serde(default)]
    rule: String,
    #[serde(default)]
    category: String,
    result: ResultStatus,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    severity: Option<Severity>,
    #[serde(default)]
    message: String,
    /// Open-ended metadata such as `version`
    #[serde(default)]
    properties: BTreeMap<String, String>,
    #[serde(default)]
    resource: Option<Resource>,
    /// Policy engine that produced the result (`kyverno`, ...)
    #[serde(default)]
    source: Option<String>,
}

impl PolicyResult {
    /// Create a result with the always-populated fields
    pub fn new(
        policy: impl Into<String>,
        result: ResultStatus,
        priority: Priority,
        message: impl Into<String>,
    ) -> Self {
        Self {
            policy: policy.into(),
            rule: String::new(),
            category: String::new(),
            result,
            priority,
            severity: None,
            message: message.into(),
            properties: BTreeMap::new(),
            resource: None,
            source: None,
        }
    }

    /// Builder: set the rule name
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = rule.into();
        self
    }

    /// Builder: set the category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Builder: set the severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Builder: set the evaluated resource
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resource = Some(resource);
        self
    }

    /// Builder: add a single property
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Builder: replace all properties
    pub fn with_properties(mut self, properties: BTreeMap<String, String>) -> Self {
        self.properties = properties;
        self
    }

    /// Builder: set the producing policy engine
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    // --- Getters ---

    pub fn policy(&self) -> &str {
        &self.policy
    }

    /// Rule name, `None` when unset or empty
    pub fn rule(&self) -> Option<&str> {
        non_empty(&self.rule)
    }

    /// Category, `None` when unset or empty
    pub fn category(&self) -> Option<&str> {
        non_empty(&self.category)
    }

    pub fn result(&self) -> ResultStatus {
        self.result
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn severity(&self) -> Option<Severity> {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn resource(&self) -> Option<&Resource> {
        self.resource.as_ref()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref().and_then(non_empty)
    }
}

fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
