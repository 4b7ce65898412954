//! Property tests for Loki labels and log lines.

use std::collections::BTreeMap;
use std::sync::Arc;

use proptest::prelude::*;

use policy_relay::domain::ports::{HttpClient, HttpRequest, HttpResponse, TransportError};
use policy_relay::infrastructure::targets::loki::line;
use policy_relay::{
    LokiOptions, LokiTarget, PolicyResult, Priority, Resource, ResultStatus, Severity, Target,
};

const OPTIONAL_KEYS: [&str; 7] = [
    "rule",
    "category",
    "severity",
    "kind",
    "name",
    "namespace",
    "uid",
];

struct NoopClient;

impl HttpClient for NoopClient {
    fn post(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
        Ok(HttpResponse { status: 204 })
    }
}

fn target(custom_labels: BTreeMap<String, String>) -> LokiTarget {
    let mut options = LokiOptions::new("loki", "http://loki:3100/api/prom/push", Arc::new(NoopClient));
    options.custom_labels = custom_labels;
    LokiTarget::new(options).expect("valid target")
}

fn priority() -> impl Strategy<Value = Priority> {
    proptest::sample::select(Priority::ALL.to_vec())
}

fn status() -> impl Strategy<Value = ResultStatus> {
    prop_oneof![
        Just(ResultStatus::Pass),
        Just(ResultStatus::Fail),
        Just(ResultStatus::Warn),
        Just(ResultStatus::Error),
        Just(ResultStatus::Skip),
    ]
}

fn severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Info),
        Just(Severity::Low),
        Just(Severity::Medium),
        Just(Severity::High),
        Just(Severity::Critical),
    ]
}

fn value() -> impl Strategy<Value = String> {
    // Non-empty so that optional fields count as present
    "\\PC{1,24}"
}

/// Custom label names that never collide with result labels
fn custom_labels() -> impl Strategy<Value = BTreeMap<String, String>> {
    proptest::collection::btree_map("custom_[a-z0-9_]{1,8}", value(), 0..4)
}

fn minimal_result() -> impl Strategy<Value = PolicyResult> {
    (value(), status(), priority(), any::<String>()).prop_map(
        |(policy, status, priority, message)| PolicyResult::new(policy, status, priority, message),
    )
}

fn full_result() -> impl Strategy<Value = PolicyResult> {
    (
        minimal_result(),
        value(),
        value(),
        severity(),
        (value(), value(), value(), value()),
    )
        .prop_map(|(result, rule, category, severity, (kind, name, namespace, uid))| {
            result
                .with_rule(rule)
                .with_category(category)
                .with_severity(severity)
                .with_resource(Resource::new(kind, name, namespace, uid))
        })
}

fn any_result() -> impl Strategy<Value = PolicyResult> {
    prop_oneof![minimal_result(), full_result()]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: the line is `[PRIORITY] message` for every priority and message.
    #[test]
    fn property_line_is_uppercase_priority_then_message(
        priority in priority(),
        message in any::<String>()
    ) {
        let result = PolicyResult::new("policy", ResultStatus::Fail, priority, message.clone());

        let expected = format!("[{}] {}", priority.as_str().to_uppercase(), message);
        prop_assert_eq!(line(&result), expected.clone());

        let payload = target(BTreeMap::new()).payload_at(&result, 1);
        prop_assert_eq!(&payload.streams[0].entries[0].line, &expected);
    }

    /// PROPERTY: absent optional fields never produce labels.
    #[test]
    fn property_minimal_results_have_no_optional_labels(result in minimal_result()) {
        let labels = target(BTreeMap::new()).labels(&result);

        for key in OPTIONAL_KEYS {
            prop_assert!(!labels.contains_key(key), "unexpected label {key}");
        }
        prop_assert_eq!(labels.len(), 4);
        prop_assert_eq!(labels.get("source"), Some("policy-reporter"));
    }

    /// PROPERTY: every populated field appears exactly once with its exact value.
    #[test]
    fn property_full_results_carry_exact_values(result in full_result()) {
        let labels = target(BTreeMap::new()).labels(&result);
        let resource = result.resource().unwrap();

        prop_assert_eq!(labels.get("policy"), Some(result.policy()));
        prop_assert_eq!(labels.get("status"), Some(result.result().as_str()));
        prop_assert_eq!(labels.get("priority"), Some(result.priority().uppercase()));
        prop_assert_eq!(labels.get("rule"), result.rule());
        prop_assert_eq!(labels.get("category"), result.category());
        prop_assert_eq!(labels.get("severity"), result.severity().map(|s| s.as_str()));
        prop_assert_eq!(labels.get("kind"), Some(resource.kind.as_str()));
        prop_assert_eq!(labels.get("name"), Some(resource.name.as_str()));
        prop_assert_eq!(labels.get("namespace"), Some(resource.namespace.as_str()));
        prop_assert_eq!(labels.get("uid"), Some(resource.uid.as_str()));

        let keys: Vec<&str> = labels.keys().collect();
        let mut unique = keys.clone();
        unique.sort_unstable();
        unique.dedup();
        prop_assert_eq!(unique.len(), keys.len());
    }

    /// PROPERTY: label values survive JSON encoding byte-for-byte.
    #[test]
    fn property_label_values_survive_json(result in full_result()) {
        let payload = target(BTreeMap::new()).payload_at(&result, 1);
        let json = serde_json::to_value(&payload).unwrap();
        let labels = &json["streams"][0]["labels"];

        prop_assert_eq!(labels["policy"].as_str(), Some(result.policy()));
        prop_assert_eq!(labels["rule"].as_str(), result.rule());
        prop_assert_eq!(labels["uid"].as_str(), result.resource().map(|r| r.uid.as_str()));
    }

    /// PROPERTY: static labels are present whatever the result looks like.
    #[test]
    fn property_custom_labels_always_present(
        custom in custom_labels(),
        result in any_result()
    ) {
        let labels = target(custom.clone()).labels(&result);

        for (key, value) in &custom {
            prop_assert_eq!(labels.get(key), Some(value.as_str()));
        }
    }

    /// PROPERTY: properties never override result or static labels.
    #[test]
    fn property_properties_never_shadow(
        custom in custom_labels(),
        result in full_result(),
        shadow in value()
    ) {
        let mut shadowed = result.clone().with_property("policy", shadow.clone());
        for key in custom.keys() {
            shadowed = shadowed.with_property(key.clone(), shadow.clone());
        }

        let target = target(custom.clone());
        let labels = target.labels(&shadowed);

        prop_assert_eq!(labels.get("policy"), Some(result.policy()));
        for (key, value) in &custom {
            prop_assert_eq!(labels.get(key), Some(value.as_str()));
        }
    }

    /// PROPERTY: the target name is the configured one, every time.
    #[test]
    fn property_name_is_stable(name in "[a-zA-Z0-9 _-]{1,24}") {
        let target = LokiTarget::new(LokiOptions::new(
            name.clone(),
            "http://loki:3100/api/prom/push",
            Arc::new(NoopClient),
        ))
        .unwrap();

        prop_assert_eq!(target.name(), name.as_str());
        prop_assert_eq!(target.name(), target.name());
    }
}
