//! Deterministic name derivation for generated identifiers.
//!
//! Every function here is pure: the same input always yields the same output, which
//! keeps generated code stable across repeated runs.

use heck::ToUpperCamelCase;

/// Irregular plurals that regular English rules get wrong for Kubernetes kinds.
const IRREGULAR_PLURALS: [(&str, &str); 4] = [
    ("endpoints", "endpoints"),
    ("podsecuritypolicy", "podsecuritypolicies"),
    ("ingress", "ingresses"),
    ("networkpolicy", "networkpolicies"),
];

/// Package name for a workload: lowercase with every non-alphanumeric character removed.
///
/// ```rust
/// use workload_resolver::utils::naming::to_package_name;
///
/// assert_eq!(to_package_name("shared-name"), "sharedname");
/// assert_eq!(to_package_name("Web Store_v2"), "webstorev2");
/// ```
#[must_use]
pub fn to_package_name(name: &str) -> String {
    name.chars().filter(char::is_ascii_alphanumeric).map(|c| c.to_ascii_lowercase()).collect()
}

/// File name stem for a generated command: lowercase, separators become underscores.
#[must_use]
pub fn to_file_name(name: &str) -> String {
    name.chars()
        .filter_map(|c| match c {
            '-' | ' ' | '.' => Some('_'),
            c if c.is_ascii_alphanumeric() || c == '_' => Some(c.to_ascii_lowercase()),
            _ => None,
        })
        .collect()
}

/// Exported identifier for a name (`webstore-ctl` → `WebstoreCtl`).
#[must_use]
pub fn to_var_name(name: &str) -> String {
    name.to_upper_camel_case()
}

/// Lowercase plural resource name for a kind, the way the API server names it.
///
/// ```rust
/// use workload_resolver::utils::naming::to_plural;
///
/// assert_eq!(to_plural("Deployment"), "deployments");
/// assert_eq!(to_plural("NetworkPolicy"), "networkpolicies");
/// assert_eq!(to_plural("Ingress"), "ingresses");
/// ```
#[must_use]
pub fn to_plural(kind: &str) -> String {
    let lower = kind.to_ascii_lowercase();

    if let Some((_, plural)) = IRREGULAR_PLURALS.iter().find(|(singular, _)| *singular == lower) {
        return (*plural).to_string();
    }

    if lower.ends_with('s')
        || lower.ends_with('x')
        || lower.ends_with('z')
        || lower.ends_with("ch")
        || lower.ends_with("sh")
    {
        return format!("{lower}es");
    }

    if let Some(stem) = lower.strip_suffix('y')
        && !stem.ends_with(['a', 'e', 'i', 'o', 'u'])
    {
        return format!("{stem}ies");
    }

    format!("{lower}s")
}

/// Fill a `%s` description template with the lowercased kind.
#[must_use]
pub fn describe(template: &str, kind: &str) -> String {
    template.replacen("%s", &kind.to_ascii_lowercase(), 1)
}
