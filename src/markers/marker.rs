//! Parsing of a single marker comment into a [`Marker`].
//!
//! A marker body looks like
//! `+operator-builder:field:name=replicas,type=int,default=2,description="Replica count"`.
//! Arguments are comma separated `key=value` pairs; values may be bare, double-quoted
//! or backtick-quoted. Backtick values may span several comment lines, which the lexer
//! joins with `\n` before calling [`parse_marker`].

use regex::Regex;
use std::sync::OnceLock;

use crate::constants::{COLLECTION_FIELD_MARKER, FIELD_MARKER};
use crate::core::WorkloadError;
use crate::workload::api_fields::FieldType;

/// Which API a marker's field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerScope {
    /// A field on the workload's own API
    Workload,
    /// A field on the owning collection's API
    Collection,
}

/// A marker argument value with its quoting preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgValue {
    /// The value with surrounding quotes removed
    pub text: String,
    /// Whether the value was quoted in the marker
    pub quoted: bool,
}

/// A parsed marker comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Which API the field belongs to
    pub scope: MarkerScope,
    /// Declared field name
    pub name: String,
    /// Explicit `type=` argument
    pub field_type: Option<FieldType>,
    /// Explicit `default=` argument
    pub default: Option<ArgValue>,
    /// Substring of the target value to replace instead of the whole value
    pub replace: Option<String>,
    /// Documentation lines from `description=`
    pub description: Vec<String>,
}

fn field_name_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9_]*(\.[A-Za-z][A-Za-z0-9_]*)*$")
            .expect("field name pattern is valid")
    })
}

/// Parse a marker comment body (the text after `#`, already trimmed).
///
/// `file` and `line` are only used to locate errors.
pub fn parse_marker(body: &str, file: &str, line: usize) -> Result<Marker, WorkloadError> {
    let (scope, args) = if let Some(args) = body.strip_prefix(COLLECTION_FIELD_MARKER) {
        (MarkerScope::Collection, args)
    } else if let Some(args) = body.strip_prefix(FIELD_MARKER) {
        (MarkerScope::Workload, args)
    } else {
        let family = body.split('=').next().unwrap_or(body);
        return Err(WorkloadError::marker(file, line, format!("unknown marker '{family}'")));
    };

    let mut name = None;
    let mut field_type = None;
    let mut default = None;
    let mut replace = None;
    let mut description = Vec::new();

    for (key, value) in split_args(args).map_err(|reason| WorkloadError::marker(file, line, reason))? {
        match key.as_str() {
            "name" => name = Some(value.text),
            "type" => {
                field_type = Some(FieldType::parse(&value.text).ok_or_else(|| {
                    WorkloadError::marker(
                        file,
                        line,
                        format!("unsupported type '{}', expected string, int or bool", value.text),
                    )
                })?);
            }
            "default" => default = Some(value),
            "replace" => {
                if value.text.is_empty() {
                    return Err(WorkloadError::marker(file, line, "replace text must not be empty"));
                }
                replace = Some(value.text);
            }
            "description" => description = documentation_lines(&value.text),
            other => {
                return Err(WorkloadError::marker(file, line, format!("unknown argument '{other}'")));
            }
        }
    }

    let name = name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| WorkloadError::marker(file, line, "missing required argument 'name'"))?;

    if !field_name_regex().is_match(&name) {
        return Err(WorkloadError::marker(file, line, format!("invalid field name '{name}'")));
    }

    if let (Some(field_type), Some(default)) = (field_type, &default)
        && !field_type.accepts(&default.text)
    {
        return Err(WorkloadError::marker(
            file,
            line,
            format!("default '{}' is not a valid {field_type}", default.text),
        ));
    }

    Ok(Marker {
        scope,
        name,
        field_type,
        default,
        replace,
        description,
    })
}

/// Split `key=value,key="quoted, value"` into pairs.
fn split_args(args: &str) -> Result<Vec<(String, ArgValue)>, String> {
    let mut pairs = Vec::new();
    let mut chars = args.trim().chars().peekable();

    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace() || *c == ',') {
            chars.next();
        }
        if chars.peek().is_none() {
            break;
        }

        let mut key = String::new();
        while let Some(&c) = chars.peek() {
            if c == '=' || c == ',' {
                break;
            }
            key.push(c);
            chars.next();
        }
        let key = key.trim().to_string();

        if chars.next() != Some('=') {
            return Err(format!("argument '{key}' has no value"));
        }

        let value = match chars.peek().copied() {
            Some(quote) if quote == '"' || quote == '`' => {
                chars.next();
                let mut text = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == quote {
                        closed = true;
                        break;
                    }
                    text.push(c);
                }
                if !closed {
                    return Err(format!("unterminated {quote} in argument '{key}'"));
                }
                ArgValue { text, quoted: true }
            }
            _ => {
                let mut text = String::new();
                while let Some(&c) = chars.peek() {
                    if c == ',' {
                        break;
                    }
                    text.push(c);
                    chars.next();
                }
                ArgValue {
                    text: text.trim().to_string(),
                    quoted: false,
                }
            }
        };

        pairs.push((key, value));
    }

    Ok(pairs)
}

/// Turn a (possibly multi-line) description into trimmed documentation lines.
fn documentation_lines(text: &str) -> Vec<String> {
    let lines: Vec<String> = text.lines().map(|l| l.trim().to_string()).collect();
    let start = lines.iter().position(|l| !l.is_empty()).unwrap_or(lines.len());
    let end = lines.iter().rposition(|l| !l.is_empty()).map_or(start, |i| i + 1);
    lines[start..end].to_vec()
}
