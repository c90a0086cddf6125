//! Marker comments in Kubernetes manifests.
//!
//! Manifests are annotated with `+operator-builder` comments that turn literal values
//! into fields of the generated custom resource:
//!
//! - `+operator-builder:field:` declares a field on the workload's own API
//! - `+operator-builder:collection:field:` declares a field on the owning collection's API
//!
//! [`parse_marker`] handles the argument syntax of a single comment, [`lex_document`]
//! scans a whole YAML document, rewrites annotated values into injection expressions
//! and collects the declared fields.

pub mod lexer;
pub mod marker;

pub use lexer::{LexContext, LexedDocument, lex_document};
pub use marker::{ArgValue, Marker, MarkerScope, parse_marker};
