//! Scenario: Push a result to a Loki endpoint over HTTP
//!
//! Journey: an operator configures one Loki target with a static cluster
//! label, a tenant header and basic auth, then a failing pod result arrives.
//!
//! Success Criteria:
//! - One POST with JSON body, user agent and configured headers
//! - Labels in fixed order, line `[PRIORITY] message`
//! - Non-2xx and connection failures surface as transient errors

use std::sync::Arc;
use std::time::Duration;

use policy_relay::domain::ports::BasicAuth;
use policy_relay::{FailureKind, LokiOptions, LokiTarget, ReqwestClient, Target, TargetError};
use serde_json::json;

use crate::common::*;

fn client() -> Arc<ReqwestClient> {
    Arc::new(ReqwestClient::new(Duration::from_secs(5)).expect("build http client"))
}

#[test]
fn scenario_loki_push_sends_labels_and_line() {
    let server = PushServer::start(204);
    let target = LokiTarget::new(
        LokiOptions::new("loki", server.url("/api/prom/push"), client())
            .with_custom_label("cluster", "dev")
            .with_header("X-Scope-OrgID", "tenant-a"),
    )
    .unwrap();

    target.send(&pod_result()).unwrap();

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/api/prom/push");
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(request.header("user-agent"), Some("Policy-Reporter"));
    assert_eq!(request.header("x-scope-orgid"), Some("tenant-a"));
    assert_eq!(request.header("authorization"), None);

    let body = request.json();
    let stream = &body["streams"][0];
    assert_eq!(
        stream["labels"],
        json!({
            "source": "policy-reporter",
            "policy": "disallow-root",
            "status": "fail",
            "priority": "HIGH",
            "kind": "Pod",
            "name": "nginx",
            "namespace": "default",
            "uid": "abc-1",
            "cluster": "dev",
            "version": "1.2",
        })
    );
    assert_eq!(stream["entries"][0]["line"], "[HIGH] root user detected");
    assert!(stream["entries"][0]["ts"].as_i64().unwrap() > 0);
}

#[test]
fn scenario_loki_push_keeps_label_order_on_the_wire() {
    let server = PushServer::start(200);
    let target = LokiTarget::new(
        LokiOptions::new("loki", server.url("/push"), client()).with_custom_label("cluster", "dev"),
    )
    .unwrap();

    target.send(&pod_result()).unwrap();

    let body = String::from_utf8(server.requests()[0].body.clone()).unwrap();
    assert!(
        body.contains(
            r#""labels":{"source":"policy-reporter","policy":"disallow-root","status":"fail","priority":"HIGH","kind":"Pod","name":"nginx","namespace":"default","uid":"abc-1","cluster":"dev","version":"1.2"}"#
        ),
        "unexpected body: {body}"
    );
}

#[test]
fn scenario_loki_push_with_basic_auth() {
    let server = PushServer::start(204);
    let target = LokiTarget::new(
        LokiOptions::new("loki", server.url("/push"), client()).with_basic_auth(BasicAuth {
            username: "user".to_string(),
            password: Some("secret".to_string()),
        }),
    )
    .unwrap();

    target.send(&minimal_result()).unwrap();

    let requests = server.requests();
    assert_eq!(
        requests[0].header("authorization"),
        Some("Basic dXNlcjpzZWNyZXQ=")
    );
}

#[test]
fn scenario_loki_push_rejected_by_server() {
    let server = PushServer::start(500);
    let target = LokiTarget::new(LokiOptions::new("loki", server.url("/push"), client())).unwrap();

    let err = target.send(&minimal_result()).unwrap_err();

    assert!(matches!(err, TargetError::Status { status: 500 }));
    assert_eq!(err.kind(), FailureKind::Transient);
    assert_eq!(server.requests().len(), 1);
}

#[test]
fn scenario_loki_push_to_unreachable_endpoint() {
    let target = LokiTarget::new(LokiOptions::new("loki", closed_url("/push"), client())).unwrap();

    let err = target.send(&minimal_result()).unwrap_err();

    assert!(matches!(err, TargetError::Transport(_)));
    assert!(err.is_transient());
}
