//! Shared helpers for the integration suite.

use assert_cmd::Command;
use std::path::PathBuf;
use workload_resolver::test_utils::{WorkloadFixture, fixtures::manifests, init_test_logging};

pub const WEB_DEPLOYMENT: &str = r#"apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
  namespace: shop  # +operator-builder:collection:field:name=namespace,type=string
spec:
  replicas: 2  # +operator-builder:field:name=replicas,default=2,type=int
"#;

pub const DB_MANIFESTS: &str = r#"apiVersion: apps/v1
kind: StatefulSet
metadata:
  name: db
  namespace: shop  # +operator-builder:collection:field:name=namespace,type=string
spec:
  replicas: 1
---
apiVersion: v1
kind: Service
metadata:
  name: db
  namespace: shop
"#;

/// The binary with colors disabled.
pub fn workload_resolver() -> Command {
    let mut cmd = Command::cargo_bin("workload-resolver").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

/// Standalone `webstore` workload with a deployment and a service.
pub fn webstore() -> (WorkloadFixture, PathBuf) {
    init_test_logging(None);

    let fixture = WorkloadFixture::new();
    fixture.write("manifests/app.yaml", manifests::DEPLOYMENT);
    fixture.write("manifests/svc.yaml", manifests::SERVICE);
    let config = fixture.standalone("webstore", &["manifests/*.yaml"]);
    (fixture, config)
}

/// Collection `shop` owning a namespace, with components `web` depending on `db`.
pub fn shop() -> (WorkloadFixture, PathBuf) {
    init_test_logging(None);

    let fixture = WorkloadFixture::new();
    fixture.write("ns.yaml", manifests::NAMESPACE);
    fixture.write("components/web/deploy.yaml", WEB_DEPLOYMENT);
    fixture.write("components/db/db.yaml", DB_MANIFESTS);
    fixture.component("components/web/workload.yaml", "web", &["deploy.yaml"], &["db"]);
    fixture.component("components/db/workload.yaml", "db", &["db.yaml"], &[]);
    let config = fixture.collection("shop", &["ns.yaml"], &["components/*/workload.yaml"]);
    (fixture, config)
}
