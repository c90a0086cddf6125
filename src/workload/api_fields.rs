//! Spec fields of a generated custom resource and the rules for merging them.
//!
//! Every marker in a manifest declares an [`APISpecField`]. Fields declared in several
//! places (twice in one manifest, or once in a collection and again in a component)
//! collapse into a single entry through [`merge_fields`].

use heck::ToUpperCamelCase;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::WorkloadError;

/// Go-equivalent type of a spec field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// `string`
    String,
    /// `int`
    Int,
    /// `bool`
    Bool,
}

impl FieldType {
    /// Parse the `type=` argument of a marker.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "int" => Some(Self::Int),
            "bool" => Some(Self::Bool),
            _ => None,
        }
    }

    /// Infer the type of a YAML scalar as written in a manifest.
    ///
    /// Quoted scalars are always strings.
    #[must_use]
    pub fn infer(value: &str, quoted: bool) -> Self {
        if quoted {
            return Self::String;
        }

        match value {
            "true" | "false" => Self::Bool,
            v if v.parse::<i64>().is_ok() => Self::Int,
            _ => Self::String,
        }
    }

    /// Whether `value` is a valid literal of this type.
    #[must_use]
    pub fn accepts(self, value: &str) -> bool {
        match self {
            Self::String => true,
            Self::Int => value.parse::<i64>().is_ok(),
            Self::Bool => matches!(value, "true" | "false"),
        }
    }

    /// Type name in generated Go code.
    #[must_use]
    pub const fn go_type(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Bool => "bool",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.go_type())
    }
}

/// One field of a workload's generated API spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct APISpecField {
    /// Name as declared by the marker; unique within a merged schema. Dots nest fields.
    pub field_name: String,
    /// Go-equivalent type
    pub field_type: FieldType,
    /// Default applied when the custom resource omits the field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Value written into the generated sample custom resource
    pub sample_value: String,
    /// Documentation lines for the generated field
    #[serde(default)]
    pub documentation_lines: Vec<String>,
    /// `file:line` of the marker that first declared the field
    pub declared_in: String,
}

impl APISpecField {
    /// Create a field with no default and no documentation.
    pub fn new(
        field_name: impl Into<String>,
        field_type: FieldType,
        declared_in: impl Into<String>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            field_type,
            default_value: None,
            sample_value: String::new(),
            documentation_lines: Vec::new(),
            declared_in: declared_in.into(),
        }
    }

    /// Set the default value; the sample follows the default.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        let default = default.into();
        self.sample_value.clone_from(&default);
        self.default_value = Some(default);
        self
    }

    /// Set the sample value.
    #[must_use]
    pub fn with_sample(mut self, sample: impl Into<String>) -> Self {
        self.sample_value = sample.into();
        self
    }

    /// Set the documentation lines.
    #[must_use]
    pub fn with_documentation<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.documentation_lines = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Go struct path of the field (`webStore.replicas` → `WebStore.Replicas`).
    #[must_use]
    pub fn struct_path(&self) -> String {
        struct_path(&self.field_name)
    }

    /// Whether the field carries any documentation.
    #[must_use]
    pub fn has_documentation(&self) -> bool {
        self.documentation_lines.iter().any(|line| !line.trim().is_empty())
    }
}

/// Go struct path for a dotted field name.
#[must_use]
pub fn struct_path(field_name: &str) -> String {
    field_name.split('.').map(ToUpperCamelCase::to_upper_camel_case).collect::<Vec<_>>().join(".")
}

/// Merge `incoming` fields into `existing`, returning the merged schema.
///
/// For each incoming field, looked up by name:
/// - absent: appended, preserving first-appearance order
/// - present with another type: [`WorkloadError::FieldConflict`]
/// - present without documentation: documentation taken from the incoming field
/// - otherwise: the existing entry is kept as is
///
/// The first declaration fixes the canonical type and default.
pub fn merge_fields(
    mut existing: Vec<APISpecField>,
    incoming: Vec<APISpecField>,
) -> Result<Vec<APISpecField>, WorkloadError> {
    for field in incoming {
        merge_field(&mut existing, field)?;
    }
    Ok(existing)
}

/// Merge a single field into `existing` in place.
pub fn merge_field(existing: &mut Vec<APISpecField>, field: APISpecField) -> Result<(), WorkloadError> {
    let Some(current) = existing.iter_mut().find(|f| f.field_name == field.field_name) else {
        existing.push(field);
        return Ok(());
    };

    if current.field_type != field.field_type {
        return Err(WorkloadError::FieldConflict {
            field: field.field_name,
            existing_type: current.field_type.to_string(),
            existing_source: current.declared_in.clone(),
            incoming_type: field.field_type.to_string(),
            incoming_source: field.declared_in,
        });
    }

    if !current.has_documentation() && field.has_documentation() {
        tracing::debug!(
            field = %current.field_name,
            from = %field.declared_in,
            "backfilling field documentation"
        );
        current.documentation_lines = field.documentation_lines;
    }

    Ok(())
}
