//! Loki Target
//!
//! Pushes every result as a single-entry stream to a Loki push endpoint:
//!
//! ```json
//! {"streams":[{"labels":{"source":"policy-reporter",...},"entries":[{"ts":1700000000000000000,"line":"[HIGH] message"}]}]}
//! ```
//!
//! Labels are built in a fixed order (domain fields, custom labels, then
//! properties) and the first writer of a key wins.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use reqwest::Url;
use serde::Serialize;
use tracing::debug;

use crate::domain::entities::PolicyResult;
use crate::domain::ports::{
    BasicAuth, HttpClient, HttpRequest, Target, TargetError, TargetResult,
};
use crate::domain::value_objects::LabelSet;

/// Value of the `source` label on every stream
pub const SOURCE_LABEL_VALUE: &str = "policy-reporter";

/// User agent sent with every push
pub const USER_AGENT: &str = "Policy-Reporter";

/// Label keys derived from result fields; custom labels may not use them
pub const DOMAIN_LABEL_KEYS: [&str; 11] = [
    "source",
    "policy",
    "status",
    "priority",
    "rule",
    "category",
    "severity",
    "kind",
    "name",
    "namespace",
    "uid",
];

/// Construction options for [`LokiTarget`]
#[derive(Clone)]
pub struct LokiOptions {
    pub name: String,
    /// Full push URL, e.g. `http://loki:3100/api/prom/push`
    pub host: String,
    pub custom_labels: BTreeMap<String, String>,
    /// Extra static request headers (tenant IDs, tokens)
    pub headers: BTreeMap<String, String>,
    pub basic_auth: Option<BasicAuth>,
    pub client: Arc<dyn HttpClient>,
}

impl LokiOptions {
    pub fn new(name: impl Into<String>, host: impl Into<String>, client: Arc<dyn HttpClient>) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            custom_labels: BTreeMap::new(),
            headers: BTreeMap::new(),
            basic_auth: None,
            client,
        }
    }

    /// Builder: add a static label
    pub fn with_custom_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_labels.insert(key.into(), value.into());
        self
    }

    /// Builder: add a static request header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Builder: set basic auth credentials
    pub fn with_basic_auth(mut self, auth: BasicAuth) -> Self {
        self.basic_auth = Some(auth);
        self
    }
}

/// Push request body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushPayload {
    pub streams: Vec<Stream>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stream {
    pub labels: LabelSet,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    /// Unix timestamp in nanoseconds
    pub ts: i64,
    pub line: String,
}

/// Loki push target
pub struct LokiTarget {
    name: String,
    host: String,
    custom_labels: BTreeMap<String, String>,
    headers: BTreeMap<String, String>,
    basic_auth: Option<BasicAuth>,
    client: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for LokiTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LokiTarget")
            .field("name", &self.name)
            .field("host", &self.host)
            .field("custom_labels", &self.custom_labels)
            .finish_non_exhaustive()
    }
}

impl LokiTarget {
    /// Validate options and build the target
    pub fn new(options: LokiOptions) -> TargetResult<Self> {
        let invalid = |message: String| TargetError::InvalidConfig {
            target: options.name.clone(),
            message,
        };

        validate_host(&options.host).map_err(invalid)?;

        for key in options.custom_labels.keys() {
            if DOMAIN_LABEL_KEYS.contains(&key.as_str()) {
                return Err(invalid(format!(
                    "custom label '{}' collides with a result label",
                    key
                )));
            }
            if !is_valid_label_name(key) {
                return Err(invalid(format!("invalid custom label name '{}'", key)));
            }
        }

        Ok(Self {
            name: options.name,
            host: options.host,
            custom_labels: options.custom_labels,
            headers: options.headers,
            basic_auth: options.basic_auth,
            client: options.client,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Build the label set for a result
    pub fn labels(&self, result: &PolicyResult) -> LabelSet {
        let mut labels = LabelSet::new();

        labels.insert("source", SOURCE_LABEL_VALUE);
        labels.insert("policy", result.policy());
        labels.insert("status", result.result().as_str());
        labels.insert("priority", result.priority().uppercase());

        if let Some(rule) = result.rule() {
            labels.insert("rule", rule);
        }
        if let Some(category) = result.category() {
            labels.insert("category", category);
        }
        if let Some(severity) = result.severity() {
            labels.insert("severity", severity.as_str());
        }

        if let Some(resource) = result.resource() {
            let fields = [
                ("kind", &resource.kind),
                ("name", &resource.name),
                ("namespace", &resource.namespace),
                ("uid", &resource.uid),
            ];
            for (key, value) in fields {
                if !value.is_empty() {
                    labels.insert(key, value.as_str());
                }
            }
        }

        for (key, value) in &self.custom_labels {
            labels.insert(key.as_str(), value.as_str());
        }

        for (key, value) in result.properties() {
            if !labels.insert(key.as_str(), value.as_str()) {
                debug!(
                    target_name = %self.name,
                    property = %key,
                    "property shadowed by an existing label"
                );
            }
        }

        labels
    }

    /// Build the payload for a result at the given timestamp
    pub fn payload_at(&self, result: &PolicyResult, ts: i64) -> PushPayload {
        PushPayload {
            streams: vec![Stream {
                labels: self.labels(result),
                entries: vec![Entry {
                    ts,
                    line: line(result),
                }],
            }],
        }
    }

    fn request(&self, body: Vec<u8>) -> HttpRequest {
        let mut request = HttpRequest::new(self.host.as_str(), body)
            .with_header("Content-Type", "application/json")
            .with_header("User-Agent", USER_AGENT)
            .with_basic_auth(self.basic_auth.clone());

        for (name, value) in &self.headers {
            request = request.with_header(name.as_str(), value.as_str());
        }

        request
    }
}

impl Target for LokiTarget {
    fn name(&self) -> &str {
        &self.name
    }

    fn send(&self, result: &PolicyResult) -> TargetResult<()> {
        let payload = self.payload_at(result, now_nanos());
        let body = serde_json::to_vec(&payload)?;

        let response = self.client.post(self.request(body))?;
        if !response.is_success() {
            return Err(TargetError::Status {
                status: response.status,
            });
        }

        debug!(target_name = %self.name, policy = %result.policy(), "pushed result");
        Ok(())
    }
}

/// Log line for a result: `[PRIORITY] message`
pub fn line(result: &PolicyResult) -> String {
    format!("[{}] {}", result.priority().uppercase(), result.message())
}

/// Loki label names follow the Prometheus grammar `[a-zA-Z_][a-zA-Z0-9_]*`
pub fn is_valid_label_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn validate_host(host: &str) -> Result<(), String> {
    if host.trim().is_empty() {
        return Err("host must not be empty".to_string());
    }

    let url = Url::parse(host).map_err(|e| format!("host '{}' is not a valid URL: {}", host, e))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("host '{}' must be an http(s) URL", host));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(format!("host '{}' has no host name", host));
    }

    Ok(())
}

fn now_nanos() -> i64 {
    Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX)
}
