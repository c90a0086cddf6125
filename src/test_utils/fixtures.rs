//! Test fixtures for workload configs and manifests
//!
//! [`WorkloadFixture`] lays out a workload on disk in a temporary directory. The
//! [`manifests`] module holds annotated sample manifests.

use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::utils::naming::to_var_name;

/// Sample manifests with and without markers.
pub mod manifests {
    /// Deployment with a trailing int marker and a head marker with a multi-line description
    pub const DEPLOYMENT: &str = r#"apiVersion: apps/v1
kind: Deployment
metadata:
  name: webstore-deploy
spec:
  replicas: 2  # +operator-builder:field:name=webStoreReplicas,default=2,type=int
  selector:
    matchLabels:
      app: webstore
  template:
    metadata:
      labels:
        app: webstore
    spec:
      containers:
        - name: webstore-container
          # +operator-builder:field:name=webStoreImage,type=string,default="nginx:1.17",description=`
          # Defines the web store image.
          # Must include a tag.`
          image: nginx:1.17
          ports:
            - containerPort: 8080
"#;

    /// Service without markers
    pub const SERVICE: &str = r#"apiVersion: v1
kind: Service
metadata:
  name: webstore-svc
spec:
  selector:
    app: webstore
  ports:
    - protocol: TCP
      port: 80
      targetPort: 8080
"#;

    /// Namespace whose name is a collection field
    pub const NAMESPACE: &str = r#"apiVersion: v1
kind: Namespace
metadata:
  name: shop  # +operator-builder:collection:field:name=namespace,type=string,description="Namespace for every component"
"#;

    /// Role granting read access to pods
    pub const ROLE: &str = r#"apiVersion: rbac.authorization.k8s.io/v1
kind: Role
metadata:
  name: pod-reader
rules:
  - apiGroups: [""]
    resources: ["pods"]
    verbs: ["get", "list", "watch"]
"#;
}

/// A workload laid out in a temporary directory.
///
/// Helpers panic on I/O failure; they are meant for tests only.
#[derive(Debug)]
pub struct WorkloadFixture {
    dir: TempDir,
}

impl Default for WorkloadFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkloadFixture {
    /// Create an empty fixture directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create fixture directory"),
        }
    }

    /// Root of the fixture.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` to `relative`, creating parent directories.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture subdirectory");
        }
        fs::write(&path, content).expect("write fixture file");
        path
    }

    /// API identity used by generated configs: kind is the CamelCase workload name.
    fn api(name: &str) -> serde_json::Value {
        json!({
            "domain": "acme.com",
            "group": "apps",
            "version": "v1alpha1",
            "kind": to_var_name(name),
        })
    }

    fn write_config(&self, relative: &str, config: &serde_json::Value) -> PathBuf {
        let yaml = serde_yaml::to_string(config).expect("serialize fixture config");
        self.write(relative, &yaml)
    }

    /// Write `workload.yaml` for a standalone workload.
    pub fn standalone(&self, name: &str, resources: &[&str]) -> PathBuf {
        self.write_config(
            "workload.yaml",
            &json!({
                "name": name,
                "kind": "StandaloneWorkload",
                "spec": {
                    "api": Self::api(name),
                    "resources": resources,
                },
            }),
        )
    }

    /// Write `collection.yaml` for a collection with a root command.
    pub fn collection(&self, name: &str, resources: &[&str], component_files: &[&str]) -> PathBuf {
        self.write_config(
            "collection.yaml",
            &json!({
                "name": name,
                "kind": "WorkloadCollection",
                "spec": {
                    "api": Self::api(name),
                    "companionCliRootcmd": { "name": format!("{name}ctl") },
                    "resources": resources,
                    "componentFiles": component_files,
                },
            }),
        )
    }

    /// Write a component config at `relative`.
    pub fn component(&self, relative: &str, name: &str, resources: &[&str], dependencies: &[&str]) -> PathBuf {
        self.write_config(
            relative,
            &json!({
                "name": name,
                "kind": "ComponentWorkload",
                "spec": {
                    "api": Self::api(name),
                    "resources": resources,
                    "dependencies": dependencies,
                },
            }),
        )
    }
}
