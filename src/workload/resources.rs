//! Turn the manifest entries of a workload config into source files, fields and rules.
//!
//! Entries are paths or glob patterns relative to the workload config file. Each
//! matching manifest is split into documents; every document is lexed for markers,
//! becomes a [`ChildResource`] and contributes RBAC and ownership rules.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::core::file_error::{self, FileOperation, FileOperationError};
use crate::core::WorkloadError;
use crate::markers::{LexContext, lex_document};

use super::api_fields::{APISpecField, merge_fields};
use super::rbac::{OwnershipRule, OwnershipRules, RBACRules, rules_for_object};
use super::source::{ChildResource, ManifestObject, SourceFile, UniqueNames, split_documents};

/// Which marker families a workload's manifests may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MarkerOptions {
    /// Collection field markers are permitted
    pub allow_collection: bool,
    /// Collection field markers declare the workload's own fields
    pub collection_is_parent: bool,
}

impl MarkerOptions {
    /// Standalone workloads only accept field markers.
    pub const STANDALONE: Self = Self {
        allow_collection: false,
        collection_is_parent: false,
    };

    /// A collection owns every field declared in its manifests.
    pub const COLLECTION: Self = Self {
        allow_collection: true,
        collection_is_parent: true,
    };

    /// Components reference their collection's fields.
    pub const COMPONENT: Self = Self {
        allow_collection: true,
        collection_is_parent: false,
    };
}

/// Everything extracted from a workload's manifests.
#[derive(Debug, Clone, Default)]
pub struct ProcessedResources {
    /// One source file per manifest, in resolution order
    pub source_files: Vec<SourceFile>,
    /// Fields of the workload's own API
    pub fields: Vec<APISpecField>,
    /// Fields contributed to the owning collection's API
    pub collection_fields: Vec<APISpecField>,
    /// Permissions needed on the children
    pub rbac_rules: RBACRules,
    /// Kinds the controller owns
    pub ownership_rules: OwnershipRules,
}

/// Expand resource entries relative to `base_dir` into manifest paths.
///
/// Glob patterns are sorted; an entry matching nothing fails with
/// [`WorkloadError::ResourceNotFound`]. A path listed twice is only returned once.
pub fn expand_resources(base_dir: &Path, entries: &[String]) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut paths = Vec::new();

    for entry in entries {
        let joined = base_dir.join(entry);

        let matches = if is_pattern(entry) {
            let pattern = joined.to_string_lossy().into_owned();
            let walker = glob::glob(&pattern).map_err(|_| WorkloadError::ResourceNotFound {
                pattern: pattern.clone(),
            })?;

            let mut matched = Vec::new();
            for item in walker {
                let path = item.map_err(|e| FileOperationError {
                    operation: FileOperation::Glob,
                    file_path: e.path().to_path_buf(),
                    purpose: "expanding resource pattern".to_string(),
                    caller: "expand_resources".to_string(),
                    source: e.into(),
                })?;
                if path.is_file() {
                    matched.push(path);
                }
            }
            matched.sort();

            if matched.is_empty() {
                return Err(WorkloadError::ResourceNotFound { pattern }.into());
            }
            matched
        } else {
            vec![joined]
        };

        for path in matches {
            if seen.insert(path.clone()) {
                paths.push(path);
            }
        }
    }

    tracing::debug!(entries = entries.len(), manifests = paths.len(), "expanded resource entries");
    Ok(paths)
}

fn is_pattern(entry: &str) -> bool {
    entry.contains(['*', '?', '['])
}

/// Lex every manifest named by `entries` and collect the workload's resources.
///
/// `config_path` is the workload config file; entries are relative to its directory.
/// Manifests are reported relative to `root_dir` in errors and `declared_in`, so
/// components of one collection never share a source name.
pub fn process_markers(
    config_path: &Path,
    root_dir: &Path,
    entries: &[String],
    options: MarkerOptions,
) -> Result<ProcessedResources> {
    let base_dir = config_dir(config_path);
    let mut processed = ProcessedResources::default();
    let mut names = UniqueNames::new();

    for manifest in expand_resources(base_dir, entries)? {
        let relative = manifest.strip_prefix(root_dir).unwrap_or(&manifest).display().to_string();
        let text = file_error::read_to_string(&manifest, "reading workload manifest", "process_markers")?;

        let source_file = process_manifest(&relative, &manifest, &text, options, &mut names, &mut processed)
            .with_context(|| format!("Failed to process manifest {relative}"))?;

        tracing::debug!(
            manifest = %relative,
            children = source_file.children.len(),
            "processed manifest"
        );
        processed.source_files.push(source_file);
    }

    Ok(processed)
}

/// Directory a config file's relative entries resolve against.
pub fn config_dir(config_path: &Path) -> &Path {
    config_path.parent().unwrap_or_else(|| Path::new(""))
}

fn process_manifest(
    relative: &str,
    manifest: &Path,
    text: &str,
    options: MarkerOptions,
    names: &mut UniqueNames,
    processed: &mut ProcessedResources,
) -> Result<SourceFile, WorkloadError> {
    let mut source_file = SourceFile::for_manifest(manifest);

    for document in split_documents(text) {
        let object = ManifestObject::parse(relative, &document.text)?;

        let ctx = LexContext {
            file: relative,
            line_offset: document.line_offset,
            allow_collection: options.allow_collection,
            collection_is_parent: options.collection_is_parent,
        };
        let lexed = lex_document(&document.text, &ctx)?;
        let static_content = lexed.is_static();

        processed.fields = merge_fields(std::mem::take(&mut processed.fields), lexed.fields)?;
        processed.collection_fields =
            merge_fields(std::mem::take(&mut processed.collection_fields), lexed.collection_fields)?;
        processed.rbac_rules.extend(rules_for_object(&object));
        processed.ownership_rules.add(OwnershipRule::for_object(&object));

        source_file.push(ChildResource {
            unique_name: names.assign(&object.kind, &object.name),
            static_content,
            cluster_scoped: object.is_cluster_scoped(),
            source_code: lexed.source_code,
            name: object.name,
            kind: object.kind,
            api_version: object.api_version,
            group: object.group,
            version: object.version,
        });
    }

    Ok(source_file)
}
