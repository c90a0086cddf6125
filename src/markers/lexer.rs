//! Line scanner that finds markers in one YAML document and rewrites its body.
//!
//! A marker either trails the value it annotates:
//!
//! ```yaml
//! replicas: 2  # +operator-builder:field:name=replicas,type=int
//! ```
//!
//! or sits on its own comment line(s) above it:
//!
//! ```yaml
//! # +operator-builder:field:name=image,default="nginx:1.19",description=`
//! # Image for the web container.`
//! image: nginx:1.19
//! ```
//!
//! In both cases the annotated scalar is replaced by `!!start parent.Spec.<Field> !!end`
//! and the marker comment lines are dropped from the rewritten body.

use crate::constants::{
    COLLECTION_RECEIVER, INJECTION_END, INJECTION_START, MARKER_PREFIX, PARENT_RECEIVER,
};
use crate::core::WorkloadError;
use crate::workload::api_fields::{APISpecField, FieldType, merge_field, struct_path};

use super::marker::{Marker, MarkerScope, parse_marker};

/// Where a document comes from and which markers it may contain.
#[derive(Debug, Clone)]
pub struct LexContext<'a> {
    /// Manifest path used in error messages and `declared_in`
    pub file: &'a str,
    /// Number of lines in the file before this document
    pub line_offset: usize,
    /// Whether collection field markers are permitted
    pub allow_collection: bool,
    /// Whether the document belongs to the collection itself, so collection fields
    /// are the workload's own fields
    pub collection_is_parent: bool,
}

/// Result of lexing one document.
#[derive(Debug, Clone, PartialEq)]
pub struct LexedDocument {
    /// Rewritten body, or the original body when no markers were found
    pub source_code: String,
    /// Fields of the workload's own API, in order of first appearance
    pub fields: Vec<APISpecField>,
    /// Fields of the owning collection's API, in order of first appearance
    pub collection_fields: Vec<APISpecField>,
    /// Number of markers recognized
    pub marker_count: usize,
}

impl LexedDocument {
    /// A document without markers is emitted literally rather than templated.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.marker_count == 0
    }
}

/// Lex one YAML document.
pub fn lex_document(text: &str, ctx: &LexContext<'_>) -> Result<LexedDocument, WorkloadError> {
    let lines: Vec<&str> = text.lines().collect();
    let mut output: Vec<String> = lines.iter().map(|l| (*l).to_string()).collect();
    let mut removed = vec![false; lines.len()];
    let mut pending: Vec<(Marker, usize)> = Vec::new();
    let mut applied: Vec<(Marker, usize, usize)> = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        let comment = find_comment(line);

        if let Some(idx) = comment
            && line[idx + 1..].trim_start().starts_with(MARKER_PREFIX)
        {
            let marker_line = ctx.line_offset + i + 1;
            let mut body = line[idx + 1..].trim().to_string();

            let mut last = i;
            while body.matches('`').count() % 2 == 1 {
                last += 1;
                let continuation = lines
                    .get(last)
                    .and_then(|next| next.trim_start().strip_prefix('#'))
                    .ok_or_else(|| {
                        WorkloadError::marker(ctx.file, marker_line, "unterminated ` in marker description")
                    })?;
                body.push('\n');
                body.push_str(continuation.trim());
                removed[last] = true;
            }

            let marker = parse_marker(&body, ctx.file, marker_line)?;
            if marker.scope == MarkerScope::Collection && !ctx.allow_collection {
                return Err(WorkloadError::marker(
                    ctx.file,
                    marker_line,
                    format!(
                        "collection field '{}' is only allowed in collections and their components",
                        marker.name
                    ),
                ));
            }

            if line[..idx].trim().is_empty() {
                removed[i] = true;
                pending.push((marker, marker_line));
            } else {
                output[i] = line[..idx].trim_end().to_string();
                applied.extend(pending.drain(..).map(|(m, l)| (m, l, i)));
                applied.push((marker, marker_line, i));
            }

            i = last + 1;
            continue;
        }

        let is_code = !comment.map_or(line, |idx| &line[..idx]).trim().is_empty();
        if is_code && !pending.is_empty() {
            applied.extend(pending.drain(..).map(|(m, l)| (m, l, i)));
        }
        i += 1;
    }

    if let Some((marker, marker_line)) = pending.first() {
        return Err(WorkloadError::marker(
            ctx.file,
            *marker_line,
            format!("marker for field '{}' is not followed by a value", marker.name),
        ));
    }

    let mut document = LexedDocument {
        source_code: text.to_string(),
        fields: Vec::new(),
        collection_fields: Vec::new(),
        marker_count: applied.len(),
    };

    if applied.is_empty() {
        return Ok(document);
    }

    for (marker, marker_line, target) in applied {
        let field = apply_marker(&mut output[target], &marker, marker_line, ctx)?;
        if marker.scope == MarkerScope::Collection && !ctx.collection_is_parent {
            merge_field(&mut document.collection_fields, field)?;
        } else {
            merge_field(&mut document.fields, field)?;
        }
    }

    let mut source_code = output
        .into_iter()
        .zip(removed)
        .filter_map(|(line, removed)| (!removed).then_some(line))
        .collect::<Vec<_>>()
        .join("\n");
    if text.ends_with('\n') {
        source_code.push('\n');
    }
    document.source_code = source_code;

    Ok(document)
}

/// Replace the scalar on `line` with an injection expression and build the field.
fn apply_marker(
    line: &mut String,
    marker: &Marker,
    marker_line: usize,
    ctx: &LexContext<'_>,
) -> Result<APISpecField, WorkloadError> {
    let (start, end) = scalar_span(line).ok_or_else(|| {
        WorkloadError::marker(
            ctx.file,
            marker_line,
            format!("marker for field '{}' must annotate a scalar value", marker.name),
        )
    })?;

    let raw = line[start..end].to_string();
    let (value, quote) = unquote(&raw);

    let receiver = match (marker.scope, ctx.collection_is_parent) {
        (MarkerScope::Collection, false) => COLLECTION_RECEIVER,
        _ => PARENT_RECEIVER,
    };
    let expression = format!("{INJECTION_START} {receiver}.Spec.{} {INJECTION_END}", struct_path(&marker.name));

    let (replacement, sample) = match &marker.replace {
        Some(text) => {
            if !value.contains(text.as_str()) {
                return Err(WorkloadError::marker(
                    ctx.file,
                    marker_line,
                    format!("replace text '{text}' not found in value '{value}'"),
                ));
            }
            let replaced = value.replace(text.as_str(), &expression);
            let replaced = match quote {
                Some(q) => format!("{q}{replaced}{q}"),
                None => replaced,
            };
            (replaced, text.clone())
        }
        None => {
            if raw.contains(INJECTION_START) {
                return Err(WorkloadError::marker(
                    ctx.file,
                    marker_line,
                    format!("value for field '{}' is already replaced by another marker", marker.name),
                ));
            }
            (expression, value.to_string())
        }
    };

    let field_type = marker
        .field_type
        .or_else(|| marker.default.as_ref().map(|d| FieldType::infer(&d.text, d.quoted)))
        .unwrap_or_else(|| {
            if marker.replace.is_some() {
                FieldType::String
            } else {
                FieldType::infer(value, quote.is_some())
            }
        });

    line.replace_range(start..end, &replacement);

    let mut field = APISpecField::new(&marker.name, field_type, format!("{}:{marker_line}", ctx.file))
        .with_sample(sample)
        .with_documentation(marker.description.iter().cloned());
    if let Some(default) = &marker.default {
        field = field.with_default(default.text.clone());
    }

    Ok(field)
}

/// Byte offset of the `#` starting a YAML comment, ignoring `#` inside quoted scalars.
pub(crate) fn find_comment(line: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut prev: Option<char> = None;

    for (i, c) in line.char_indices() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None => {
                let at_token_start = prev
                    .is_none_or(|p| p.is_whitespace() || matches!(p, ':' | '[' | '{' | ',' | '-'));
                if (c == '"' || c == '\'') && at_token_start {
                    quote = Some(c);
                } else if c == '#' && prev.is_none_or(char::is_whitespace) {
                    return Some(i);
                }
            }
        }
        prev = Some(c);
    }

    None
}

/// Byte range of the plain or quoted scalar on a `key: value` or `- value` line.
fn scalar_span(line: &str) -> Option<(usize, usize)> {
    let code = &line[..find_comment(line).unwrap_or(line.len())];
    let end = code.trim_end().len();
    let mut pos = code.len() - code.trim_start().len();

    let mut is_item = false;
    if let Some(after) = code[pos..end].strip_prefix("- ") {
        is_item = true;
        pos += 2 + (after.len() - after.trim_start().len());
    }

    let rest = &code[pos..end];
    let start = match find_key_separator(rest) {
        Some(colon) => {
            let after = &rest[colon + 1..];
            pos + colon + 1 + (after.len() - after.trim_start().len())
        }
        None if is_item => pos,
        None => return None,
    };

    if start >= end {
        return None;
    }

    let value = &code[start..end];
    if value.starts_with(['|', '>', '{', '[', '&', '*', '!']) {
        return None;
    }

    Some((start, end))
}

/// Index of the `:` ending a mapping key, if `rest` starts with one.
fn find_key_separator(rest: &str) -> Option<usize> {
    let is_separator = |idx: usize| {
        rest.as_bytes().get(idx) == Some(&b':')
            && rest[idx + 1..].chars().next().is_none_or(char::is_whitespace)
    };

    if let Some(q) = rest.chars().next().filter(|c| *c == '"' || *c == '\'') {
        let close = rest[1..].find(q)? + 1;
        return is_separator(close + 1).then_some(close + 1);
    }

    rest.char_indices().find(|(i, c)| *c == ':' && is_separator(*i)).map(|(i, _)| i)
}

/// Strip matching surrounding quotes from a scalar.
fn unquote(raw: &str) -> (&str, Option<char>) {
    for q in ['"', '\''] {
        if raw.len() >= 2 && raw.starts_with(q) && raw.ends_with(q) {
            return (&raw[1..raw.len() - 1], Some(q));
        }
    }
    (raw, None)
}
