use predicates::prelude::*;

use crate::common::{shop, webstore, workload_resolver};

#[test]
fn test_missing_config_file() {
    workload_resolver()
        .args(["validate", "does-not-exist.yaml"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("does-not-exist.yaml"));
}

#[test]
fn test_validation_lists_missing_fields() {
    let (fixture, _) = webstore();
    let config = fixture.write("workload.yaml", "name: webstore\nkind: StandaloneWorkload\nspec:\n  api:\n    domain: acme.com\n");

    workload_resolver()
        .arg("validate")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("spec.api.group, spec.api.version, spec.api.kind"))
        .stderr(predicate::str::contains("suggestion: Add the missing fields"));
}

#[test]
fn test_unknown_dependency_suggests_similar_name() {
    let (fixture, config) = shop();
    fixture.component("components/web/workload.yaml", "web", &["deploy.yaml"], &["dbb"]);

    workload_resolver()
        .arg("resolve")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("depends on unknown component 'dbb'"))
        .stderr(predicate::str::contains("Did you mean: db?"));
}

#[test]
fn test_field_type_conflict_names_field() {
    let (fixture, _) = webstore();
    fixture.write(
        "conflict.yaml",
        "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: settings\ndata:\n  replicas: \"2\"  # +operator-builder:field:name=webStoreReplicas,type=string\n",
    );
    let config = fixture.standalone("webstore", &["manifests/app.yaml", "conflict.yaml"]);

    workload_resolver()
        .arg("rbac")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("webStoreReplicas"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_missing_resource_pattern() {
    let (fixture, _) = webstore();
    let config = fixture.standalone("webstore", &["missing/*.yaml"]);

    workload_resolver()
        .arg("validate")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no manifest files match resource entry"));
}

#[test]
fn test_wrong_component_kind() {
    let (fixture, config) = shop();
    fixture.write(
        "components/web/workload.yaml",
        "name: web\nkind: StandaloneWorkload\nspec:\n  api:\n    domain: acme.com\n    group: apps\n    version: v1\n    kind: Web\n",
    );

    workload_resolver()
        .arg("validate")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected kind ComponentWorkload, found StandaloneWorkload"));
}
