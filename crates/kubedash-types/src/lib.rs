//! Shared types for kubedash
//!
//! This crate contains the normalized shapes that every fetcher, correlator
//! and view in kubedash passes around.

use ratatui::style::Color;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Placeholder used wherever a value does not apply or is not known.
pub const NOT_APPLICABLE: &str = "N/A";

/// PV-side placeholder for a claim whose volume cannot be found.
pub const NO_MATCHING_PV: &str = "No matching PV";

/// Cluster name used when none is configured.
pub const UNKNOWN_CLUSTER: &str = "Unknown Cluster";

// ============================================================================
// Resource kinds
// ============================================================================

/// Kubernetes resource kinds known to kubedash
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Kind {
    Node,
    Namespace,
    Pod,
    Deployment,
    StatefulSet,
    ReplicaSet,
    Service,
    Secret,
    StorageClass,
    PersistentVolume,
    PersistentVolumeClaim,
    CustomResourceDefinition,
    ClusterRole,
    ClusterRoleBinding,
    Event,
}

impl Kind {
    /// Kinds covered by search, in the order their matches are concatenated.
    pub const SEARCHABLE: [Kind; 13] = [
        Kind::Namespace,
        Kind::Pod,
        Kind::Node,
        Kind::Deployment,
        Kind::StatefulSet,
        Kind::Service,
        Kind::Secret,
        Kind::StorageClass,
        Kind::PersistentVolume,
        Kind::PersistentVolumeClaim,
        Kind::CustomResourceDefinition,
        Kind::ClusterRole,
        Kind::ClusterRoleBinding,
    ];

    /// Whether objects of this kind live inside a namespace
    pub fn is_namespaced(&self) -> bool {
        !matches!(
            self,
            Self::Node
                | Self::Namespace
                | Self::StorageClass
                | Self::PersistentVolume
                | Self::CustomResourceDefinition
                | Self::ClusterRole
                | Self::ClusterRoleBinding
        )
    }

    /// The API kind name, e.g. "PersistentVolumeClaim"
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Node => "Node",
            Self::Namespace => "Namespace",
            Self::Pod => "Pod",
            Self::Deployment => "Deployment",
            Self::StatefulSet => "StatefulSet",
            Self::ReplicaSet => "ReplicaSet",
            Self::Service => "Service",
            Self::Secret => "Secret",
            Self::StorageClass => "StorageClass",
            Self::PersistentVolume => "PersistentVolume",
            Self::PersistentVolumeClaim => "PersistentVolumeClaim",
            Self::CustomResourceDefinition => "CustomResourceDefinition",
            Self::ClusterRole => "ClusterRole",
            Self::ClusterRoleBinding => "ClusterRoleBinding",
            Self::Event => "Event",
        }
    }

    /// Plural display label for list headers
    pub fn label(&self) -> &'static str {
        match self {
            Self::Node => "Nodes",
            Self::Namespace => "Namespaces",
            Self::Pod => "Pods",
            Self::Deployment => "Deployments",
            Self::StatefulSet => "StatefulSets",
            Self::ReplicaSet => "ReplicaSets",
            Self::Service => "Services",
            Self::Secret => "Secrets",
            Self::StorageClass => "Storage Classes",
            Self::PersistentVolume => "Persistent Volumes",
            Self::PersistentVolumeClaim => "Persistent Volume Claims",
            Self::CustomResourceDefinition => "Custom Resource Definitions",
            Self::ClusterRole => "Cluster Roles",
            Self::ClusterRoleBinding => "Cluster Role Bindings",
            Self::Event => "Events",
        }
    }

    /// Parse a kind from its API name, plural or common short name
    /// (case-insensitive), e.g. "pods", "pvc", "StorageClass".
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        let kind = match lower.as_str() {
            "node" | "nodes" | "no" => Self::Node,
            "namespace" | "namespaces" | "ns" => Self::Namespace,
            "pod" | "pods" | "po" => Self::Pod,
            "deployment" | "deployments" | "deploy" => Self::Deployment,
            "statefulset" | "statefulsets" | "sts" => Self::StatefulSet,
            "replicaset" | "replicasets" | "rs" => Self::ReplicaSet,
            "service" | "services" | "svc" => Self::Service,
            "secret" | "secrets" => Self::Secret,
            "storageclass" | "storageclasses" | "sc" => Self::StorageClass,
            "persistentvolume" | "persistentvolumes" | "pv" => Self::PersistentVolume,
            "persistentvolumeclaim" | "persistentvolumeclaims" | "pvc" => {
                Self::PersistentVolumeClaim
            }
            "customresourcedefinition" | "customresourcedefinitions" | "crd" | "crds" => {
                Self::CustomResourceDefinition
            }
            "clusterrole" | "clusterroles" => Self::ClusterRole,
            "clusterrolebinding" | "clusterrolebindings" => Self::ClusterRoleBinding,
            "event" | "events" | "ev" => Self::Event,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Normalized records
// ============================================================================

/// A kind-specific attribute value
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Text(String),
    Count(i64),
    Flag(bool),
    List(Vec<String>),
}

impl AttrValue {
    /// The "N/A" placeholder value
    pub fn not_applicable() -> Self {
        Self::Text(NOT_APPLICABLE.to_string())
    }

    pub fn as_count(&self) -> Option<i64> {
        match self {
            Self::Count(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Count(n) => write!(f, "{}", n),
            Self::Flag(b) => write!(f, "{}", b),
            Self::List(items) if items.is_empty() => f.write_str("<none>"),
            Self::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for AttrValue {
    fn from(n: i64) -> Self {
        Self::Count(n)
    }
}

impl From<i32> for AttrValue {
    fn from(n: i32) -> Self {
        Self::Count(n.into())
    }
}

impl From<usize> for AttrValue {
    fn from(n: usize) -> Self {
        Self::Count(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

/// Kind-specific fields of a record, ordered by key
pub type Attributes = BTreeMap<String, AttrValue>;

/// A back-reference to the controller that created a resource
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OwnerRef {
    pub kind: String,
    pub name: String,
}

impl OwnerRef {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
        }
    }
}

/// The uniform shape every fetcher produces
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NormalizedRecord {
    pub kind: Kind,
    pub name: String,
    /// Owning namespace, or "N/A" for cluster-scoped kinds
    pub namespace: String,
    pub status: String,
    pub attributes: Attributes,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub owner_references: Vec<OwnerRef>,
}

impl NormalizedRecord {
    /// Create a record. The namespace is only kept for namespaced kinds;
    /// cluster-scoped kinds always get "N/A".
    pub fn new(
        kind: Kind,
        name: impl Into<String>,
        namespace: Option<String>,
        status: impl Into<String>,
    ) -> Self {
        let namespace = if kind.is_namespaced() {
            namespace.unwrap_or_default()
        } else {
            NOT_APPLICABLE.to_string()
        };

        Self {
            kind,
            name: name.into(),
            namespace,
            status: status.into(),
            attributes: Attributes::new(),
            owner_references: Vec::new(),
        }
    }

    /// Builder-style attribute insert
    pub fn with_attr(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn set_attr(&mut self, key: &str, value: impl Into<AttrValue>) {
        self.attributes.insert(key.to_string(), value.into());
    }

    pub fn attr(&self, key: &str) -> Option<&AttrValue> {
        self.attributes.get(key)
    }

    /// Attribute rendered for display, "N/A" when absent
    pub fn attr_display(&self, key: &str) -> String {
        self.attr(key)
            .map(|v| v.to_string())
            .unwrap_or_else(|| NOT_APPLICABLE.to_string())
    }
}

// ============================================================================
// Correlated views
// ============================================================================

/// A PVC joined with the PV it claims
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VolumeBinding {
    pub pvc_name: String,
    pub pvc_namespace: String,
    pub pvc_status: String,
    /// Bound PV name, or "No matching PV"
    pub pv_name: String,
    pub pv_status: String,
    pub capacity: String,
    pub storage_class: String,
}

/// Live CPU/memory usage of a node or pod
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UsageRecord {
    pub name: String,
    pub namespace: String,
    pub cpu_cores: Option<f64>,
    pub memory_mib: Option<f64>,
}

impl UsageRecord {
    /// The single record reported when no metrics backend answers
    pub fn unavailable() -> Self {
        Self {
            name: NOT_APPLICABLE.to_string(),
            namespace: NOT_APPLICABLE.to_string(),
            cpu_cores: None,
            memory_mib: None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        self.name == NOT_APPLICABLE && self.cpu_cores.is_none() && self.memory_mib.is_none()
    }

    pub fn cpu_display(&self) -> String {
        self.cpu_cores
            .map(|c| format!("{:.3}", c))
            .unwrap_or_else(|| NOT_APPLICABLE.to_string())
    }

    pub fn memory_display(&self) -> String {
        self.memory_mib
            .map(|m| format!("{:.1}Mi", m))
            .unwrap_or_else(|| NOT_APPLICABLE.to_string())
    }
}

// ============================================================================
// Detail lookups
// ============================================================================

/// A titled group of key/value lines on a detail page
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DetailSection {
    pub title: String,
    pub entries: Vec<(String, String)>,
}

impl DetailSection {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            entries: Vec::new(),
        }
    }

    pub fn entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }
}

/// Everything shown for a single resource
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResourceDetail {
    pub record: NormalizedRecord,
    pub created: Option<String>,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
    pub sections: Vec<DetailSection>,
}

impl ResourceDetail {
    pub fn new(record: NormalizedRecord) -> Self {
        Self {
            record,
            created: None,
            labels: BTreeMap::new(),
            annotations: BTreeMap::new(),
            sections: Vec::new(),
        }
    }
}

/// Structured error payload returned instead of a detail
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    pub error: String,
}

impl ErrorRecord {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.error)
    }
}

// ============================================================================
// Cluster summary
// ============================================================================

/// Where the dashboard is pointed, resolved once at startup
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClusterIdentity {
    pub api_server_address: String,
    pub cluster_name: String,
}

/// Derived cluster health
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
    Unknown,
}

impl HealthStatus {
    /// Healthy when every node is ready. Zero nodes counts as healthy.
    pub fn from_counts(total_nodes: usize, healthy_nodes: usize) -> Self {
        if total_nodes == healthy_nodes {
            Self::Healthy
        } else {
            Self::Unhealthy
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::Unhealthy => "Unhealthy",
            Self::Unknown => "Unknown",
        }
    }

    /// Get display color for this status
    pub fn color(&self) -> Color {
        match self {
            Self::Healthy => Color::Green,
            Self::Unhealthy => Color::Red,
            Self::Unknown => Color::Yellow,
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar counts shown on the dashboard landing page
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClusterSummary {
    pub api_server_address: String,
    pub cluster_name: String,
    pub total_nodes: usize,
    pub healthy_nodes: usize,
    pub health_status: HealthStatus,
    pub total_pods: usize,
    pub total_namespaces: usize,
    pub total_deployments: usize,
    pub total_services: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_scoped_record_gets_placeholder_namespace() {
        let record = NormalizedRecord::new(
            Kind::Node,
            "worker-1",
            Some("ignored".to_string()),
            "Ready",
        );
        assert_eq!(record.namespace, NOT_APPLICABLE);

        let record = NormalizedRecord::new(Kind::Pod, "web-1", Some("prod".to_string()), "Running");
        assert_eq!(record.namespace, "prod");
    }

    #[test]
    fn test_kind_scope() {
        for kind in Kind::SEARCHABLE {
            let record = NormalizedRecord::new(kind, "x", Some("ns".to_string()), "");
            assert_eq!(record.namespace == NOT_APPLICABLE, !kind.is_namespaced());
        }
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(Kind::parse("pods"), Some(Kind::Pod));
        assert_eq!(Kind::parse("PVC"), Some(Kind::PersistentVolumeClaim));
        assert_eq!(Kind::parse("StorageClass"), Some(Kind::StorageClass));
        assert_eq!(Kind::parse("widgets"), None);
    }

    #[test]
    fn test_health_from_counts() {
        assert_eq!(HealthStatus::from_counts(3, 3), HealthStatus::Healthy);
        assert_eq!(HealthStatus::from_counts(3, 2), HealthStatus::Unhealthy);
        // Degenerate empty cluster
        assert_eq!(HealthStatus::from_counts(0, 0), HealthStatus::Healthy);
    }

    #[test]
    fn test_attr_display() {
        let record = NormalizedRecord::new(Kind::Service, "api", Some("default".to_string()), "ClusterIP")
            .with_attr("ports", vec!["80/TCP".to_string(), "443/TCP".to_string()])
            .with_attr("replicas", 3);
        assert_eq!(record.attr_display("ports"), "80/TCP, 443/TCP");
        assert_eq!(record.attr_display("replicas"), "3");
        assert_eq!(record.attr_display("missing"), NOT_APPLICABLE);
    }

    #[test]
    fn test_record_serializes_flat_attributes() {
        let record = NormalizedRecord::new(Kind::Pod, "web-1", Some("prod".to_string()), "Running")
            .with_attr("restarts", 2);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "Pod");
        assert_eq!(json["attributes"]["restarts"], 2);
        assert!(json.get("owner_references").is_none());
    }

    #[test]
    fn test_unavailable_usage_sentinel() {
        let usage = UsageRecord::unavailable();
        assert!(usage.is_unavailable());
        assert_eq!(usage.cpu_display(), "N/A");
        assert_eq!(usage.memory_display(), "N/A");
    }
}
