use predicates::prelude::*;

use crate::common::{shop, webstore, workload_resolver};

#[test]
fn test_resolve_prints_yaml() {
    let (_fixture, config) = webstore();

    workload_resolver()
        .arg("resolve")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("kind: StandaloneWorkload"))
        .stdout(predicate::str::contains("packageName: webstore"))
        .stdout(predicate::str::contains("fieldName: webStoreReplicas"));
}

#[test]
fn test_resolve_prints_json() {
    let (_fixture, config) = shop();

    let output = workload_resolver()
        .args(["resolve", "--format", "json"])
        .arg(&config)
        .assert()
        .success();

    let value: serde_json::Value = serde_json::from_slice(&output.get_output().stdout).unwrap();
    assert_eq!(value["kind"], "WorkloadCollection");
    assert_eq!(value["components"][0]["name"], "db");
    assert_eq!(value["components"][1]["dependencies"][0], "db");
    assert_eq!(value["apiSpecFields"][0]["fieldName"], "namespace");
}

#[test]
fn test_rbac_prints_marker_lines() {
    let (_fixture, config) = webstore();

    workload_resolver()
        .arg("rbac")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "// +kubebuilder:rbac:groups=apps.acme.com,resources=webstores,verbs=get;list;watch;create;update;patch;delete\n",
        ))
        .stdout(predicate::str::contains("resources=services,"));
}

#[test]
fn test_validate_reports_success() {
    let (_fixture, config) = shop();

    workload_resolver()
        .arg("validate")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("collection workload 'shop' is valid"))
        .stdout(predicate::str::contains("Components: 2"));
}

#[test]
fn test_verbose_logs_to_stderr() {
    let (_fixture, config) = webstore();

    workload_resolver()
        .args(["--verbose", "validate"])
        .arg(&config)
        .assert()
        .success()
        .stderr(predicate::str::contains("resolved workload"));
}

#[test]
fn test_quiet_silences_logs() {
    let (_fixture, config) = webstore();

    workload_resolver()
        .args(["--quiet", "validate"])
        .arg(&config)
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}
