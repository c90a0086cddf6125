//! Constants used throughout the workload resolver.
//!
//! Default command descriptions, marker prefixes and RBAC verbs live here so that
//! every module reads the same immutable values.

/// Prefix shared by every marker comment.
pub const MARKER_PREFIX: &str = "+operator-builder:";

/// Marker family for fields on the workload's own API.
pub const FIELD_MARKER: &str = "+operator-builder:field:";

/// Marker family for fields on the owning collection's API.
pub const COLLECTION_FIELD_MARKER: &str = "+operator-builder:collection:field:";

/// Opening delimiter of a value-injection expression in rewritten source.
pub const INJECTION_START: &str = "!!start";

/// Closing delimiter of a value-injection expression in rewritten source.
pub const INJECTION_END: &str = "!!end";

/// Receiver used for references to the workload's own spec.
pub const PARENT_RECEIVER: &str = "parent";

/// Receiver used for references to the owning collection's spec.
pub const COLLECTION_RECEIVER: &str = "collection";

/// RBAC verbs in the order they are rendered.
pub const CANONICAL_VERBS: [&str; 7] = ["get", "list", "watch", "create", "update", "patch", "delete"];

/// Verbs granted on the `/status` subresource of a workload's own resource.
pub const STATUS_VERBS: [&str; 3] = ["get", "update", "patch"];

/// Verbs a component needs on its collection's resource.
pub const READ_VERBS: [&str; 3] = ["get", "list", "watch"];

/// Default root command description for standalone workloads (`%s` is the kind).
pub const DEFAULT_STANDALONE_DESCRIPTION: &str = "Manage %s workload";

/// Default root command description for collections.
pub const DEFAULT_COLLECTION_ROOTCOMMAND_DESCRIPTION: &str = "Manage %s collection and components";

/// Default subcommand description for collections.
pub const DEFAULT_COLLECTION_SUBCOMMAND_DESCRIPTION: &str = "Manage %s workload";

/// Default subcommand name for collections.
pub const DEFAULT_COLLECTION_SUBCOMMAND_NAME: &str = "collection";

/// Default subcommand description for components.
pub const DEFAULT_COMPONENT_SUBCOMMAND_DESCRIPTION: &str = "Manage %s workload";

/// Kind of Kubernetes object whose constructors also run at init time.
pub const CRD_KIND: &str = "CustomResourceDefinition";

/// Kinds that are never namespaced.
pub const CLUSTER_SCOPED_KINDS: [&str; 13] = [
    "APIService",
    "CSIDriver",
    "ClusterRole",
    "ClusterRoleBinding",
    "CustomResourceDefinition",
    "IngressClass",
    "MutatingWebhookConfiguration",
    "Namespace",
    "PersistentVolume",
    "PriorityClass",
    "RuntimeClass",
    "StorageClass",
    "ValidatingWebhookConfiguration",
];
