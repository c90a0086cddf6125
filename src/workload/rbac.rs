//! RBAC and ownership requirements of a workload's controller.
//!
//! The controller needs full access to every kind it manages, plus access to its own
//! custom resource. For `Role` and `ClusterRole` children it also needs every
//! permission those roles grant, since Kubernetes refuses to let a subject grant
//! permissions it does not hold itself.

use serde::{Serialize, Serializer};
use std::collections::BTreeSet;

use crate::constants::{CANONICAL_VERBS, READ_VERBS, STATUS_VERBS};
use crate::utils::naming::to_plural;

use super::APISpec;
use super::source::ManifestObject;

/// Kinds whose `rules` are escalated into the controller's own permissions.
const ROLE_KINDS: [&str; 2] = ["Role", "ClusterRole"];

/// Permission on one resource of one API group.
///
/// Verbs are a set: two rules with the same verbs in any order are equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RBACRule {
    /// API group, empty for the core group
    pub group: String,
    /// Plural resource name, possibly with a subresource (`webstores/status`)
    pub resource: String,
    /// Granted verbs
    #[serde(serialize_with = "serialize_verbs")]
    pub verbs: BTreeSet<String>,
}

impl RBACRule {
    /// Rule granting `verbs` on `group`/`resource`.
    pub fn new<I, S>(group: impl Into<String>, resource: impl Into<String>, verbs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            group: group.into(),
            resource: resource.into(),
            verbs: verbs.into_iter().map(Into::into).collect(),
        }
    }

    /// Rule granting every canonical verb.
    pub fn full_access(group: impl Into<String>, resource: impl Into<String>) -> Self {
        Self::new(group, resource, CANONICAL_VERBS)
    }

    /// Verbs in canonical order, unknown verbs appended alphabetically.
    #[must_use]
    pub fn ordered_verbs(&self) -> Vec<&str> {
        canonical_order(&self.verbs)
    }

    /// Verbs joined the way kubebuilder markers expect (`get;list;watch`).
    #[must_use]
    pub fn verb_string(&self) -> String {
        self.ordered_verbs().join(";")
    }

    /// Group as written in markers; the core group is spelled `core`.
    #[must_use]
    pub fn group_name(&self) -> &str {
        if self.group.is_empty() { "core" } else { &self.group }
    }

    /// The `+kubebuilder:rbac` marker line for this rule.
    #[must_use]
    pub fn to_marker_line(&self) -> String {
        format!(
            "+kubebuilder:rbac:groups={},resources={},verbs={}",
            self.group_name(),
            self.resource,
            self.verb_string()
        )
    }

    fn same_target(&self, other: &Self) -> bool {
        self.group == other.group && self.resource == other.resource
    }
}

fn canonical_order(verbs: &BTreeSet<String>) -> Vec<&str> {
    let mut ordered: Vec<&str> =
        CANONICAL_VERBS.iter().copied().filter(|verb| verbs.contains(*verb)).collect();
    ordered.extend(verbs.iter().map(String::as_str).filter(|verb| !CANONICAL_VERBS.contains(verb)));
    ordered
}

fn serialize_verbs<S: Serializer>(verbs: &BTreeSet<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(canonical_order(verbs))
}

/// Deduplicated list of rules in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RBACRules {
    rules: Vec<RBACRule>,
}

impl RBACRules {
    /// Empty rule list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule; verbs of a rule with the same group and resource are unioned.
    pub fn add(&mut self, rule: RBACRule) {
        match self.rules.iter_mut().find(|existing| existing.same_target(&rule)) {
            Some(existing) => existing.verbs.extend(rule.verbs),
            None => self.rules.push(rule),
        }
    }

    /// Add every rule of `rules`.
    pub fn extend(&mut self, rules: impl IntoIterator<Item = RBACRule>) {
        for rule in rules {
            self.add(rule);
        }
    }

    /// Rules in order of first appearance.
    #[must_use]
    pub fn as_slice(&self) -> &[RBACRule] {
        &self.rules
    }

    /// Iterate over the rules.
    pub fn iter(&self) -> std::slice::Iter<'_, RBACRule> {
        self.rules.iter()
    }

    /// Number of distinct rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rule was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Marker lines for every rule.
    #[must_use]
    pub fn marker_lines(&self) -> Vec<String> {
        self.rules.iter().map(RBACRule::to_marker_line).collect()
    }
}

impl<'a> IntoIterator for &'a RBACRules {
    type Item = &'a RBACRule;
    type IntoIter = std::slice::Iter<'a, RBACRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// Rules the controller needs to manage `object`.
#[must_use]
pub fn rules_for_object(object: &ManifestObject) -> Vec<RBACRule> {
    let mut rules = vec![RBACRule::full_access(&object.group, to_plural(&object.kind))];

    if ROLE_KINDS.contains(&object.kind.as_str()) {
        rules.extend(granted_rules(&object.value));
    }

    rules
}

/// Rules granted by the `rules` list of a Role or ClusterRole.
fn granted_rules(role: &serde_yaml::Value) -> Vec<RBACRule> {
    let Some(entries) = role.get("rules").and_then(serde_yaml::Value::as_sequence) else {
        return Vec::new();
    };

    let strings = |entry: &serde_yaml::Value, key: &str| -> Vec<String> {
        entry
            .get(key)
            .and_then(serde_yaml::Value::as_sequence)
            .map(|items| items.iter().filter_map(|i| i.as_str().map(ToString::to_string)).collect())
            .unwrap_or_default()
    };

    let mut rules = Vec::new();
    for entry in entries {
        let mut verbs = strings(entry, "verbs");
        if verbs.iter().any(|verb| verb == "*") {
            verbs = CANONICAL_VERBS.iter().map(ToString::to_string).collect();
        }
        if verbs.is_empty() {
            continue;
        }

        for group in strings(entry, "apiGroups") {
            for resource in strings(entry, "resources") {
                rules.push(RBACRule::new(group.clone(), resource, verbs.iter().cloned()));
            }
        }
    }

    rules
}

/// Rules for the workload's own custom resource and its status subresource.
#[must_use]
pub fn own_resource_rules(api: &APISpec) -> Vec<RBACRule> {
    let plural = to_plural(&api.kind);
    vec![
        RBACRule::full_access(api.resource_group(), plural.clone()),
        RBACRule::new(api.resource_group(), format!("{plural}/status"), STATUS_VERBS),
    ]
}

/// Read access a component needs on its collection's custom resource.
#[must_use]
pub fn collection_read_rule(collection_api: &APISpec) -> RBACRule {
    RBACRule::new(collection_api.resource_group(), to_plural(&collection_api.kind), READ_VERBS)
}

/// A kind the controller sets owner references on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipRule {
    /// API version without the group
    pub version: String,
    /// API group, empty for the core group
    pub group: String,
    /// Kubernetes kind
    pub kind: String,
    /// Whether the kind lives in the core group
    pub core_api: bool,
}

impl OwnershipRule {
    /// Ownership of the kind of `object`.
    #[must_use]
    pub fn for_object(object: &ManifestObject) -> Self {
        Self {
            version: object.version.clone(),
            group: object.group.clone(),
            kind: object.kind.clone(),
            core_api: object.group.is_empty(),
        }
    }
}

/// Deduplicated ownership rules in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OwnershipRules {
    rules: Vec<OwnershipRule>,
}

impl OwnershipRules {
    /// Empty rule list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule unless the same group, version and kind is already present.
    pub fn add(&mut self, rule: OwnershipRule) {
        if !self.rules.contains(&rule) {
            self.rules.push(rule);
        }
    }

    /// Rules in order of first appearance.
    #[must_use]
    pub fn as_slice(&self) -> &[OwnershipRule] {
        &self.rules
    }

    /// Number of distinct rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rule was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(text: &str) -> ManifestObject {
        ManifestObject::parse("test.yaml", text).unwrap()
    }

    fn api() -> APISpec {
        APISpec {
            domain: "acme.com".to_string(),
            group: "apps".to_string(),
            version: "v1alpha1".to_string(),
            kind: "WebStore".to_string(),
            cluster_scoped: false,
        }
    }

    #[test]
    fn test_verbs_are_a_set() {
        let a = RBACRule::new("apps", "deployments", ["list", "get"]);
        let b = RBACRule::new("apps", "deployments", ["get", "list", "get"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_canonical_verb_order() {
        let rule = RBACRule::new("", "pods", ["escalate", "delete", "get", "bind", "watch"]);
        assert_eq!(rule.verb_string(), "get;watch;delete;bind;escalate");
    }

    #[test]
    fn test_marker_line_uses_core_group() {
        let rule = RBACRule::full_access("", "services");
        assert_eq!(
            rule.to_marker_line(),
            "+kubebuilder:rbac:groups=core,resources=services,verbs=get;list;watch;create;update;patch;delete"
        );
    }

    #[test]
    fn test_duplicate_rules_collapse() {
        let first = object("apiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: a\n");
        let second = object("apiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: b\n");

        let mut rules = RBACRules::new();
        rules.extend(rules_for_object(&first));
        rules.extend(rules_for_object(&second));

        assert_eq!(rules.len(), 1);
        assert_eq!(rules.as_slice()[0], RBACRule::full_access("apps", "deployments"));
    }

    #[test]
    fn test_add_unions_verbs() {
        let mut rules = RBACRules::new();
        rules.add(RBACRule::new("", "pods", ["get"]));
        rules.add(RBACRule::new("", "pods", ["list", "watch"]));
        assert_eq!(rules.as_slice()[0].verb_string(), "get;list;watch");
    }

    #[test]
    fn test_role_grants_are_escalated() {
        let role = object(
            r#"apiVersion: rbac.authorization.k8s.io/v1
kind: Role
metadata:
  name: reader
rules:
  - apiGroups: [""]
    resources: ["pods", "configmaps"]
    verbs: ["get", "list"]
  - apiGroups: ["batch"]
    resources: ["jobs"]
    verbs: ["*"]
"#,
        );

        let rules = rules_for_object(&role);
        assert_eq!(rules.len(), 4);
        assert_eq!(rules[0], RBACRule::full_access("rbac.authorization.k8s.io", "roles"));
        assert_eq!(rules[1], RBACRule::new("", "pods", ["get", "list"]));
        assert_eq!(rules[2], RBACRule::new("", "configmaps", ["get", "list"]));
        assert_eq!(rules[3], RBACRule::full_access("batch", "jobs"));
    }

    #[test]
    fn test_own_resource_rules() {
        let rules = own_resource_rules(&api());
        assert_eq!(
            rules[0].to_marker_line(),
            "+kubebuilder:rbac:groups=apps.acme.com,resources=webstores,verbs=get;list;watch;create;update;patch;delete"
        );
        assert_eq!(
            rules[1].to_marker_line(),
            "+kubebuilder:rbac:groups=apps.acme.com,resources=webstores/status,verbs=get;update;patch"
        );
    }

    #[test]
    fn test_collection_read_rule() {
        assert_eq!(collection_read_rule(&api()).verb_string(), "get;list;watch");
    }

    #[test]
    fn test_ownership_dedupes() {
        let service = object("apiVersion: v1\nkind: Service\nmetadata:\n  name: a\n");
        let other = object("apiVersion: v1\nkind: Service\nmetadata:\n  name: b\n");

        let mut rules = OwnershipRules::new();
        rules.add(OwnershipRule::for_object(&service));
        rules.add(OwnershipRule::for_object(&other));

        assert_eq!(rules.len(), 1);
        assert!(rules.as_slice()[0].core_api);
        assert_eq!(rules.as_slice()[0].version, "v1");
    }

    #[test]
    fn test_serialized_verbs_are_ordered() {
        let rule = RBACRule::new("apps", "deployments", ["watch", "get"]);
        let json = serde_json::to_string(&rule).unwrap();
        assert_eq!(json, r#"{"group":"apps","resource":"deployments","verbs":["get","watch"]}"#);
    }
}
