//! Test fixtures - reusable results and configuration for tests.

use std::fs;
use std::path::PathBuf;

use policy_relay::{PolicyResult, Priority, Resource, ResultStatus, Severity};
use tempfile::TempDir;

/// A result with only the always-present fields
pub fn minimal_result() -> PolicyResult {
    PolicyResult::new(
        "disallow-root",
        ResultStatus::Fail,
        Priority::High,
        "root user detected",
    )
}

/// The same result against a namespaced pod, with a version property
pub fn pod_result() -> PolicyResult {
    minimal_result()
        .with_resource(Resource::new("Pod", "nginx", "default", "abc-1"))
        .with_property("version", "1.2")
}

/// A result with every optional field populated
pub fn full_result() -> PolicyResult {
    pod_result()
        .with_rule("check-run-as-non-root")
        .with_category("Pod Security")
        .with_severity(Severity::Medium)
        .with_source("kyverno")
}

/// The summary template shipped in `templates/`
pub fn shipped_template_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates")
}

/// A temp dir holding `summary.html` with the given content
pub fn template_dir_with(template: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    fs::write(dir.path().join("summary.html"), template).expect("write template");
    dir
}
