//! Error handling for the workload resolver
//!
//! This module provides the typed error kinds raised while resolving workloads and the
//! user-facing reporting layer used by the CLI. The error system follows two principles:
//! 1. **Strongly-typed errors** so callers can branch on the kind of failure
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`WorkloadError`] - Enumerated error kinds for every structural failure
//! - [`ErrorContext`] - Wrapper that adds details and suggestions for display
//!
//! # Error Categories
//!
//! - **Configuration**: [`WorkloadError::Validation`], [`WorkloadError::ConfigParse`]
//! - **Manifests**: [`WorkloadError::MarkerParse`], [`WorkloadError::ManifestParse`],
//!   [`WorkloadError::ResourceNotFound`]
//! - **Schema**: [`WorkloadError::FieldConflict`]
//! - **Components**: [`WorkloadError::UnknownDependency`], [`WorkloadError::DependencyCycle`],
//!   [`WorkloadError::DuplicateComponent`], [`WorkloadError::UnsupportedOperation`]
//!
//! Phases return `anyhow::Result` and attach the workload or file being processed with
//! `.context()`. The typed error stays reachable through [`anyhow::Error::downcast_ref`],
//! which is what [`user_friendly_error`] relies on.
//!
//! # Examples
//!
//! ```rust,no_run
//! use workload_resolver::core::{WorkloadError, user_friendly_error};
//!
//! let error = WorkloadError::Validation {
//!     workload: "webstore".to_string(),
//!     missing: vec!["spec.api.domain".to_string(), "spec.api.kind".to_string()],
//! };
//!
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::workload::WorkloadKind;

/// The main error type for workload resolution.
///
/// Every variant carries enough context (file, line, workload or field name) that the
/// failure can be fixed without a second reproduction run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkloadError {
    /// One or more required identity fields are missing from a workload config.
    ///
    /// All missing fields are collected before this error is raised, so a single run
    /// reports every problem with the config.
    #[error("missing required fields for workload '{workload}': [{}]", missing.join(", "))]
    Validation {
        /// Name of the workload (may be empty when the name itself is missing)
        workload: String,
        /// Dotted paths of every missing field, in declaration order
        missing: Vec<String>,
    },

    /// A workload config file could not be deserialized
    #[error("invalid workload config in {file}: {reason}")]
    ConfigParse {
        /// Path to the config file
        file: String,
        /// Parser message
        reason: String,
    },

    /// A marker comment is malformed or not allowed in this position
    ///
    /// # Fields
    /// - `file`: The manifest containing the marker
    /// - `line`: 1-based line number of the marker comment
    /// - `reason`: What is wrong with the marker
    #[error("invalid marker at {file}:{line}: {reason}")]
    MarkerParse {
        /// Path to the manifest file
        file: String,
        /// 1-based line number of the marker
        line: usize,
        /// Description of the problem
        reason: String,
    },

    /// A manifest document is not a usable Kubernetes object
    #[error("invalid manifest {file}: {reason}")]
    ManifestParse {
        /// Path to the manifest file
        file: String,
        /// Description of the problem
        reason: String,
    },

    /// A resource entry (path or glob pattern) matched no files
    #[error("no manifest files match resource entry '{pattern}'")]
    ResourceNotFound {
        /// The entry as written in the workload config, resolved against its directory
        pattern: String,
    },

    /// The same spec field was declared with incompatible types
    #[error(
        "field '{field}' declared as '{existing_type}' in {existing_source} conflicts with '{incoming_type}' in {incoming_source}"
    )]
    FieldConflict {
        /// Field name shared by both declarations
        field: String,
        /// Type of the first (canonical) declaration
        existing_type: String,
        /// Location of the first declaration
        existing_source: String,
        /// Type of the conflicting declaration
        incoming_type: String,
        /// Location of the conflicting declaration
        incoming_source: String,
    },

    /// A component depends on a name that is not a component of the collection
    #[error("component '{component}' depends on unknown component '{dependency}'")]
    UnknownDependency {
        /// Component declaring the dependency
        component: String,
        /// Name that could not be found
        dependency: String,
        /// Names of the components that do exist, used for suggestions
        available: Vec<String>,
    },

    /// Components depend on each other in a cycle
    ///
    /// Example: A depends on B, B depends on A. The chain closes on its first element.
    #[error("circular component dependency detected: {}", chain.join(" → "))]
    DependencyCycle {
        /// Component names along the cycle, first element repeated at the end
        chain: Vec<String>,
    },

    /// Two components of one collection share a name
    #[error("duplicate component name '{name}' in collection")]
    DuplicateComponent {
        /// The duplicated name
        name: String,
    },

    /// An operation that this workload variant does not support
    #[error("{operation} not allowed on {variant} workload")]
    UnsupportedOperation {
        /// The rejected operation
        operation: String,
        /// The variant it was invoked on
        variant: WorkloadKind,
    },
}

impl WorkloadError {
    /// Shorthand for a marker error at a given location.
    pub fn marker(file: impl Into<String>, line: usize, reason: impl Into<String>) -> Self {
        Self::MarkerParse {
            file: file.into(),
            line,
            reason: reason.into(),
        }
    }
}

/// Error wrapper that adds details and a suggestion to a [`WorkloadError`].
///
/// Used by the CLI to render failures; library code never needs to build one.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: WorkloadError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
    /// Context messages attached while the error propagated, outermost first
    pub trail: Vec<String>,
}

impl ErrorContext {
    /// Create a new error context without suggestions or details.
    #[must_use]
    pub const fn new(error: WorkloadError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
            trail: Vec::new(),
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: red and bold
    /// - Context trail: plain, indented
    /// - Details: yellow
    /// - Suggestion: green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        for step in &self.trail {
            eprintln!("  {} {}", "while".dimmed(), step);
        }

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        for step in &self.trail {
            write!(f, "\n  while {step}")?;
        }

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Maximum Levenshtein distance, as a percentage of the target length, for suggestions.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Convert any error into a user-friendly [`ErrorContext`].
///
/// Typed [`WorkloadError`]s anywhere in the chain get a tailored suggestion. File
/// operation errors are rendered with their own message. Anything else is wrapped as
/// a generic manifest error carrying the full chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let trail: Vec<String> = error
        .chain()
        .take_while(|cause| cause.downcast_ref::<WorkloadError>().is_none())
        .map(ToString::to_string)
        .collect();

    if let Some(workload_error) =
        error.chain().find_map(|cause| cause.downcast_ref::<WorkloadError>())
    {
        let mut ctx = create_error_context(workload_error.clone());
        ctx.trail = trail;
        return ctx;
    }

    if let Some(file_error) = error
        .chain()
        .find_map(|cause| cause.downcast_ref::<super::file_error::FileOperationError>())
    {
        return ErrorContext::new(WorkloadError::ManifestParse {
            file: file_error.file_path.display().to_string(),
            reason: file_error.source.to_string(),
        })
        .with_details(file_error.user_message())
        .with_suggestion("Check that every path in the workload config is relative to the config file");
    }

    let message = error.chain().map(ToString::to_string).collect::<Vec<_>>().join(": ");
    ErrorContext::new(WorkloadError::ManifestParse {
        file: "unknown".to_string(),
        reason: message,
    })
}

fn create_error_context(error: WorkloadError) -> ErrorContext {
    match &error {
        WorkloadError::Validation { .. } => ErrorContext::new(error)
            .with_suggestion("Add the missing fields to the workload config file")
            .with_details("Every workload needs a name and a full API identity (domain, group, version, kind)"),

        WorkloadError::ConfigParse { .. } => ErrorContext::new(error)
            .with_suggestion("Check the YAML syntax and that 'kind' is one of StandaloneWorkload, WorkloadCollection or ComponentWorkload"),

        WorkloadError::MarkerParse { .. } => ErrorContext::new(error)
            .with_suggestion("Markers look like '# +operator-builder:field:name=myField,type=string,default=\"value\"'")
            .with_details("Collection markers (+operator-builder:collection:field) are only valid in collections and their components"),

        WorkloadError::ManifestParse { .. } => ErrorContext::new(error)
            .with_suggestion("Each YAML document needs 'apiVersion', 'kind' and 'metadata.name'"),

        WorkloadError::ResourceNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Resource paths and patterns are resolved relative to the workload config file"),

        WorkloadError::FieldConflict { field, .. } => {
            let field = field.clone();
            ErrorContext::new(error)
                .with_suggestion(format!("Declare '{field}' with the same type everywhere, or rename one of the fields"))
                .with_details("The first declaration of a field fixes its type in the generated API")
        }

        WorkloadError::UnknownDependency { dependency, available, .. } => {
            let similar = find_similar(dependency, available);
            let suggestion = if similar.is_empty() {
                format!("Available components: {}", available.join(", "))
            } else {
                format!("Did you mean: {}?", similar.join(", "))
            };
            ErrorContext::new(error).with_suggestion(suggestion)
        }

        WorkloadError::DependencyCycle { .. } => ErrorContext::new(error)
            .with_suggestion("Remove one of the dependencies in the cycle")
            .with_details("Component creation order must be acyclic"),

        WorkloadError::DuplicateComponent { .. } => ErrorContext::new(error)
            .with_suggestion("Give every component of a collection a unique name"),

        WorkloadError::UnsupportedOperation { .. } => ErrorContext::new(error)
            .with_suggestion("Use a WorkloadCollection to group component workloads"),
    }
}

/// Find names close to `target` using Levenshtein distance.
fn find_similar(target: &str, available: &[String]) -> Vec<String> {
    let mut scored: Vec<_> = available
        .iter()
        .map(|name| (name.clone(), strsim::levenshtein(target, name)))
        .collect();

    scored.sort_by_key(|(_, distance)| *distance);

    scored
        .into_iter()
        .filter(|(_, distance)| *distance <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
        .take(3)
        .map(|(name, _)| name)
        .collect()
}
