//! Source model of a workload: one [`SourceFile`] per manifest, one [`ChildResource`]
//! per YAML document.
//!
//! The generated operator gets a constructor function per child resource. This module
//! decides the names of those constructors and parses the identity (`apiVersion`,
//! `kind`, `metadata.name`) of every document.

use heck::ToUpperCamelCase;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

use crate::constants::{CLUSTER_SCOPED_KINDS, CRD_KIND};
use crate::core::WorkloadError;
use crate::utils::naming::to_file_name;

/// A constructor specification for one child resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildResource {
    /// `metadata.name` of the object
    pub name: String,
    /// Kubernetes kind
    pub kind: String,
    /// Full `apiVersion`, e.g. `apps/v1`
    pub api_version: String,
    /// API group, empty for the core group
    pub group: String,
    /// API version without the group
    pub version: String,
    /// Identifier unique within the workload, e.g. `DeploymentWebstoreDeploy`
    pub unique_name: String,
    /// Rewritten body, or the literal body when `static_content` is set
    pub source_code: String,
    /// Whether the document had no markers
    pub static_content: bool,
    /// Whether the kind is never namespaced
    pub cluster_scoped: bool,
}

impl ChildResource {
    /// Name of the generated constructor.
    #[must_use]
    pub fn create_func_name(&self) -> String {
        format!("Create{}", self.unique_name)
    }

    /// Whether the constructor also has to run when the operator starts.
    #[must_use]
    pub fn runs_at_init(&self) -> bool {
        self.kind == CRD_KIND
    }
}

/// Generated Go source for one manifest file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    /// Generated file name, e.g. `app.go` for `app.yaml`
    pub filename: String,
    /// Children in document order
    pub children: Vec<ChildResource>,
    /// Whether any child is emitted literally
    pub has_static: bool,
}

impl SourceFile {
    /// Empty source file for a manifest path.
    #[must_use]
    pub fn for_manifest(manifest: &Path) -> Self {
        Self {
            filename: source_filename(manifest),
            children: Vec::new(),
            has_static: false,
        }
    }

    /// Append a child, keeping `has_static` current.
    pub fn push(&mut self, child: ChildResource) {
        self.has_static |= child.static_content;
        self.children.push(child);
    }
}

/// Generated file name for a manifest: the snake-cased stem with a `.go` extension.
#[must_use]
pub fn source_filename(manifest: &Path) -> String {
    let stem = manifest.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    format!("{}.go", to_file_name(&stem))
}

/// One YAML document of a manifest file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestDocument {
    /// Document body without the `---` separator
    pub text: String,
    /// Number of lines preceding the body in the file
    pub line_offset: usize,
}

/// Split a manifest into its YAML documents.
///
/// Documents holding only comments or blank lines are dropped.
#[must_use]
pub fn split_documents(text: &str) -> Vec<ManifestDocument> {
    let mut documents = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut start = 0;

    let mut flush = |lines: &mut Vec<&str>, start: usize| {
        let has_content = lines.iter().any(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        });
        if has_content {
            let mut body = lines.join("\n");
            body.push('\n');
            documents.push(ManifestDocument {
                text: body,
                line_offset: start,
            });
        }
        lines.clear();
    };

    for (i, line) in text.lines().enumerate() {
        if is_document_separator(line) {
            flush(&mut current, start);
            start = i + 1;
        } else {
            current.push(line);
        }
    }
    flush(&mut current, start);

    documents
}

fn is_document_separator(line: &str) -> bool {
    line.strip_prefix("---")
        .is_some_and(|rest| rest.is_empty() || rest.starts_with([' ', '\t']))
}

/// Identity of a Kubernetes object plus its parsed body.
#[derive(Debug, Clone)]
pub struct ManifestObject {
    /// Full `apiVersion`
    pub api_version: String,
    /// API group, empty for the core group
    pub group: String,
    /// Version without the group
    pub version: String,
    /// Kubernetes kind
    pub kind: String,
    /// `metadata.name`
    pub name: String,
    /// The whole document
    pub value: serde_yaml::Value,
}

impl ManifestObject {
    /// Parse the identity of one document. `file` is only used in errors.
    pub fn parse(file: &str, text: &str) -> Result<Self, WorkloadError> {
        let invalid = |reason: String| WorkloadError::ManifestParse {
            file: file.to_string(),
            reason,
        };

        let value: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|e| invalid(e.to_string()))?;
        if !value.is_mapping() {
            return Err(invalid("document is not a mapping".to_string()));
        }

        let string_at = |path: &[&str]| -> Option<String> {
            let mut node = &value;
            for key in path {
                node = node.get(*key)?;
            }
            node.as_str().map(ToString::to_string)
        };

        let api_version =
            string_at(&["apiVersion"]).ok_or_else(|| invalid("missing string 'apiVersion'".to_string()))?;
        let kind = string_at(&["kind"]).ok_or_else(|| invalid("missing string 'kind'".to_string()))?;
        let name = string_at(&["metadata", "name"])
            .ok_or_else(|| invalid(format!("{kind} is missing string 'metadata.name'")))?;

        let (group, version) = split_api_version(&api_version);

        Ok(Self {
            group: group.to_string(),
            version: version.to_string(),
            api_version,
            kind,
            name,
            value,
        })
    }

    /// Whether objects of this kind are cluster scoped.
    #[must_use]
    pub fn is_cluster_scoped(&self) -> bool {
        CLUSTER_SCOPED_KINDS.contains(&self.kind.as_str())
    }
}

/// Split `apps/v1` into `("apps", "v1")` and `v1` into `("", "v1")`.
#[must_use]
pub fn split_api_version(api_version: &str) -> (&str, &str) {
    api_version.rsplit_once('/').unwrap_or(("", api_version))
}

/// Hands out unique names for the children of one workload.
#[derive(Debug, Default)]
pub struct UniqueNames {
    seen: HashMap<String, usize>,
}

impl UniqueNames {
    /// Create an empty name registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Unique name for `<kind>-<name>`; repeats get the suffix `2`, `3` and so on.
    pub fn assign(&mut self, kind: &str, name: &str) -> String {
        let base = format!("{kind}-{name}").to_upper_camel_case();
        let count = self.seen.entry(base.clone()).or_insert(0);
        *count += 1;

        if *count == 1 {
            return base;
        }

        // A suffixed name may itself collide with a later base name.
        let mut n = *count;
        loop {
            let candidate = format!("{base}{n}");
            if !self.seen.contains_key(&candidate) {
                self.seen.insert(candidate.clone(), 1);
                return candidate;
            }
            n += 1;
        }
    }
}

/// Create and init function names across `source_files`, in file-then-child order.
#[must_use]
pub fn func_names(source_files: &[SourceFile]) -> (Vec<String>, Vec<String>) {
    let mut create = Vec::new();
    let mut init = Vec::new();

    for child in source_files.iter().flat_map(|file| &file.children) {
        let func = child.create_func_name();
        if child.runs_at_init() {
            init.push(func.clone());
        }
        create.push(func);
    }

    (create, init)
}
