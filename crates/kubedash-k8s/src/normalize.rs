//! Mapping from raw API objects to [`NormalizedRecord`]s
//!
//! Every function here is total: missing optional fields become zero or
//! "N/A"/"Unknown" placeholders, never an error.

use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use k8s_openapi::api::apps::v1::{Deployment, ReplicaSet, StatefulSet};
use k8s_openapi::api::core::v1::{
    Event, Namespace, Node, PersistentVolume, PersistentVolumeClaim, Pod, Secret, Service,
};
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding};
use k8s_openapi::api::storage::v1::StorageClass;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kubedash_types::{AttrValue, Kind, NOT_APPLICABLE, NormalizedRecord, OwnerRef};

use crate::units::age_since;

pub(crate) const UNKNOWN: &str = "Unknown";

/// Annotation marking the cluster's default storage class
const DEFAULT_CLASS_ANNOTATION: &str = "storageclass.kubernetes.io/is-default-class";

/// Label prefix carrying node roles
const NODE_ROLE_PREFIX: &str = "node-role.kubernetes.io/";

/// Start a record from object metadata, filling in the age attribute
fn base(kind: Kind, meta: &ObjectMeta, status: impl Into<String>) -> NormalizedRecord {
    let mut record = NormalizedRecord::new(
        kind,
        meta.name.clone().unwrap_or_default(),
        meta.namespace.clone(),
        status,
    );

    let age = meta
        .creation_timestamp
        .as_ref()
        .map(|t| age_since(&t.0, Utc::now()))
        .unwrap_or_else(|| UNKNOWN.to_string());
    record.set_attr("age", age);

    record
}

/// Creation timestamp as RFC 3339 text
pub(crate) fn created(meta: &ObjectMeta) -> Option<String> {
    meta.creation_timestamp
        .as_ref()
        .map(|t| t.0.to_rfc3339_opts(SecondsFormat::Secs, true))
}

pub(crate) fn quantity(map: Option<&BTreeMap<String, Quantity>>, key: &str) -> String {
    map.and_then(|m| m.get(key))
        .map(|q| q.0.clone())
        .unwrap_or_else(|| NOT_APPLICABLE.to_string())
}

fn text_or_na(value: Option<&String>) -> AttrValue {
    value
        .map(|v| AttrValue::Text(v.clone()))
        .unwrap_or_else(AttrValue::not_applicable)
}

/// True iff the node reports a `Ready` condition with status `True`
pub fn node_is_ready(node: &Node) -> bool {
    node.status
        .as_ref()
        .and_then(|s| s.conditions.as_ref())
        .is_some_and(|conditions| {
            conditions
                .iter()
                .any(|c| c.type_ == "Ready" && c.status == "True")
        })
}

pub fn node(node: Node) -> NormalizedRecord {
    let status = if node_is_ready(&node) { "Ready" } else { "NotReady" };
    let mut record = base(Kind::Node, &node.metadata, status);

    let roles: Vec<String> = node
        .metadata
        .labels
        .iter()
        .flatten()
        .filter_map(|(k, _)| k.strip_prefix(NODE_ROLE_PREFIX))
        .map(str::to_string)
        .collect();
    record.set_attr("roles", roles);

    if let Some(status) = &node.status {
        let info = status.node_info.as_ref();
        record.set_attr(
            "kubelet_version",
            text_or_na(info.map(|i| &i.kubelet_version)),
        );
        record.set_attr("os_image", text_or_na(info.map(|i| &i.os_image)));

        let internal_ip = status
            .addresses
            .iter()
            .flatten()
            .find(|a| a.type_ == "InternalIP")
            .map(|a| &a.address);
        record.set_attr("internal_ip", text_or_na(internal_ip));
        record.set_attr("cpu_capacity", quantity(status.capacity.as_ref(), "cpu"));
        record.set_attr(
            "memory_capacity",
            quantity(status.capacity.as_ref(), "memory"),
        );
    }

    record
}

pub fn namespace(ns: Namespace) -> NormalizedRecord {
    let phase = ns
        .status
        .and_then(|s| s.phase)
        .unwrap_or_else(|| UNKNOWN.to_string());
    base(Kind::Namespace, &ns.metadata, phase)
}

pub fn pod(pod: Pod) -> NormalizedRecord {
    let phase = pod
        .status
        .as_ref()
        .and_then(|s| s.phase.clone())
        .unwrap_or_else(|| UNKNOWN.to_string());
    let mut record = base(Kind::Pod, &pod.metadata, phase);

    record.owner_references = pod
        .metadata
        .owner_references
        .iter()
        .flatten()
        .map(|o| OwnerRef::new(o.kind.clone(), o.name.clone()))
        .collect();

    let node_name = pod.spec.as_ref().and_then(|s| s.node_name.as_ref());
    record.set_attr("node", text_or_na(node_name));

    let status = pod.status.as_ref();
    record.set_attr("pod_ip", text_or_na(status.and_then(|s| s.pod_ip.as_ref())));

    let container_statuses = status
        .and_then(|s| s.container_statuses.as_deref())
        .unwrap_or_default();
    let total = pod
        .spec
        .as_ref()
        .map(|s| s.containers.len())
        .unwrap_or(container_statuses.len());
    let ready = container_statuses.iter().filter(|c| c.ready).count();
    let restarts: i64 = container_statuses
        .iter()
        .map(|c| i64::from(c.restart_count))
        .sum();
    record.set_attr("ready", format!("{}/{}", ready, total));
    record.set_attr("restarts", restarts);

    record
}

fn with_replicas(record: NormalizedRecord, desired: i32, ready: i32) -> NormalizedRecord {
    record
        .with_attr("desired_replicas", desired)
        .with_attr("ready_replicas", ready)
}

fn container_images(spec: Option<&k8s_openapi::api::core::v1::PodSpec>) -> Vec<String> {
    spec.map(|s| {
        s.containers
            .iter()
            .map(|c| c.image.clone().unwrap_or_else(|| NOT_APPLICABLE.to_string()))
            .collect()
    })
    .unwrap_or_default()
}

pub fn deployment(deploy: Deployment) -> NormalizedRecord {
    let spec = deploy.spec.as_ref();
    let desired = spec.and_then(|s| s.replicas).unwrap_or(0);
    let status = deploy.status.as_ref();
    let ready = status.and_then(|s| s.ready_replicas).unwrap_or(0);
    let available = status.and_then(|s| s.available_replicas).unwrap_or(0);

    let record = base(
        Kind::Deployment,
        &deploy.metadata,
        format!("Replicas: {}", desired),
    );
    let strategy = spec
        .and_then(|s| s.strategy.as_ref())
        .and_then(|s| s.type_.as_ref());

    with_replicas(record, desired, ready)
        .with_attr("available_replicas", available)
        .with_attr("strategy", text_or_na(strategy))
        .with_attr(
            "images",
            container_images(spec.and_then(|s| s.template.spec.as_ref())),
        )
}

pub fn stateful_set(sts: StatefulSet) -> NormalizedRecord {
    let spec = sts.spec.as_ref();
    let desired = spec.and_then(|s| s.replicas).unwrap_or(0);
    let ready = sts
        .status
        .as_ref()
        .and_then(|s| s.ready_replicas)
        .unwrap_or(0);

    let record = base(
        Kind::StatefulSet,
        &sts.metadata,
        format!("Replicas: {}", desired),
    );
    with_replicas(record, desired, ready).with_attr(
        "images",
        container_images(spec.and_then(|s| s.template.spec.as_ref())),
    )
}

pub fn replica_set(rs: ReplicaSet) -> NormalizedRecord {
    let desired = rs.spec.as_ref().and_then(|s| s.replicas).unwrap_or(0);
    let ready = rs
        .status
        .as_ref()
        .and_then(|s| s.ready_replicas)
        .unwrap_or(0);

    let mut record = base(
        Kind::ReplicaSet,
        &rs.metadata,
        format!("Replicas: {}", desired),
    );
    record.owner_references = rs
        .metadata
        .owner_references
        .iter()
        .flatten()
        .map(|o| OwnerRef::new(o.kind.clone(), o.name.clone()))
        .collect();
    with_replicas(record, desired, ready)
}

pub fn service(svc: Service) -> NormalizedRecord {
    let spec = svc.spec.as_ref();
    let svc_type = spec
        .and_then(|s| s.type_.clone())
        .unwrap_or_else(|| "ClusterIP".to_string());
    let record = base(Kind::Service, &svc.metadata, svc_type);

    let ports: Vec<String> = spec
        .and_then(|s| s.ports.as_ref())
        .iter()
        .flat_map(|ports| ports.iter())
        .map(|p| {
            let protocol = p.protocol.as_deref().unwrap_or("TCP");
            match p.node_port {
                Some(node_port) => format!("{}:{}/{}", p.port, node_port, protocol),
                None => format!("{}/{}", p.port, protocol),
            }
        })
        .collect();

    record
        .with_attr("cluster_ip", text_or_na(spec.and_then(|s| s.cluster_ip.as_ref())))
        .with_attr("ports", ports)
}

pub fn secret(secret: Secret) -> NormalizedRecord {
    let secret_type = secret
        .type_
        .clone()
        .unwrap_or_else(|| "Opaque".to_string());
    let keys = secret.data.as_ref().map(|d| d.len()).unwrap_or(0);
    base(Kind::Secret, &secret.metadata, secret_type).with_attr("keys", keys)
}

/// Whether the storage class carries the default-class annotation
pub(crate) fn is_default_class(sc: &StorageClass) -> bool {
    sc.metadata
        .annotations
        .as_ref()
        .and_then(|a| a.get(DEFAULT_CLASS_ANNOTATION))
        .is_some_and(|v| v == "true")
}

pub fn storage_class(sc: StorageClass) -> NormalizedRecord {
    let status = if is_default_class(&sc) { "Default" } else { "Available" };
    base(Kind::StorageClass, &sc.metadata, status)
        .with_attr("provisioner", sc.provisioner.clone())
        .with_attr("reclaim_policy", text_or_na(sc.reclaim_policy.as_ref()))
        .with_attr(
            "volume_binding_mode",
            text_or_na(sc.volume_binding_mode.as_ref()),
        )
        .with_attr(
            "allow_volume_expansion",
            sc.allow_volume_expansion.unwrap_or(false),
        )
}

pub fn persistent_volume(pv: PersistentVolume) -> NormalizedRecord {
    let phase = pv
        .status
        .as_ref()
        .and_then(|s| s.phase.clone())
        .unwrap_or_else(|| UNKNOWN.to_string());
    let mut record = base(Kind::PersistentVolume, &pv.metadata, phase);

    let spec = pv.spec.as_ref();
    record.set_attr(
        "capacity",
        quantity(spec.and_then(|s| s.capacity.as_ref()), "storage"),
    );
    record.set_attr(
        "access_modes",
        spec.and_then(|s| s.access_modes.clone()).unwrap_or_default(),
    );
    record.set_attr(
        "reclaim_policy",
        text_or_na(spec.and_then(|s| s.persistent_volume_reclaim_policy.as_ref())),
    );
    record.set_attr(
        "storage_class",
        text_or_na(spec.and_then(|s| s.storage_class_name.as_ref())),
    );

    let claim = spec.and_then(|s| s.claim_ref.as_ref()).map(|c| {
        format!(
            "{}/{}",
            c.namespace.as_deref().unwrap_or_default(),
            c.name.as_deref().unwrap_or_default()
        )
    });
    record.set_attr("claim", text_or_na(claim.as_ref()));

    record
}

pub fn persistent_volume_claim(pvc: PersistentVolumeClaim) -> NormalizedRecord {
    let status = pvc.status.as_ref();
    let phase = status
        .and_then(|s| s.phase.clone())
        .unwrap_or_else(|| UNKNOWN.to_string());
    let mut record = base(Kind::PersistentVolumeClaim, &pvc.metadata, phase);

    let spec = pvc.spec.as_ref();
    record.set_attr(
        "volume_name",
        text_or_na(spec.and_then(|s| s.volume_name.as_ref())),
    );
    record.set_attr(
        "storage_class",
        text_or_na(spec.and_then(|s| s.storage_class_name.as_ref())),
    );
    record.set_attr(
        "access_modes",
        spec.and_then(|s| s.access_modes.clone()).unwrap_or_default(),
    );

    // Bound claims report actual capacity; pending ones only their request
    let capacity = match status.and_then(|s| s.capacity.as_ref()) {
        Some(capacity) => quantity(Some(capacity), "storage"),
        None => quantity(
            spec.and_then(|s| s.resources.as_ref())
                .and_then(|r| r.requests.as_ref()),
            "storage",
        ),
    };
    record.set_attr("capacity", capacity);

    record
}

pub fn custom_resource_definition(crd: CustomResourceDefinition) -> NormalizedRecord {
    let established = crd
        .status
        .as_ref()
        .and_then(|s| s.conditions.as_ref())
        .is_some_and(|conditions| {
            conditions
                .iter()
                .any(|c| c.type_ == "Established" && c.status == "True")
        });
    let status = if established { "Established" } else { "NotEstablished" };

    let versions: Vec<String> = crd.spec.versions.iter().map(|v| v.name.clone()).collect();
    base(Kind::CustomResourceDefinition, &crd.metadata, status)
        .with_attr("group", crd.spec.group.clone())
        .with_attr("kind", crd.spec.names.kind.clone())
        .with_attr("scope", crd.spec.scope.clone())
        .with_attr("versions", versions)
}

pub fn cluster_role(role: ClusterRole) -> NormalizedRecord {
    let rules = role.rules.as_ref().map(|r| r.len()).unwrap_or(0);
    base(Kind::ClusterRole, &role.metadata, "Active")
        .with_attr("rules", rules)
        .with_attr("aggregated", role.aggregation_rule.is_some())
}

pub fn cluster_role_binding(binding: ClusterRoleBinding) -> NormalizedRecord {
    let subjects: Vec<String> = binding
        .subjects
        .iter()
        .flatten()
        .map(|s| match &s.namespace {
            Some(ns) => format!("{}:{}/{}", s.kind, ns, s.name),
            None => format!("{}:{}", s.kind, s.name),
        })
        .collect();

    base(Kind::ClusterRoleBinding, &binding.metadata, "Active")
        .with_attr(
            "role",
            format!("{}/{}", binding.role_ref.kind, binding.role_ref.name),
        )
        .with_attr("subjects", subjects)
}

pub fn event(event: Event) -> NormalizedRecord {
    let event_type = event
        .type_
        .clone()
        .unwrap_or_else(|| "Normal".to_string());
    let last_seen = event
        .last_timestamp
        .as_ref()
        .or(event.first_timestamp.as_ref())
        .map(|t| t.0.to_rfc3339_opts(SecondsFormat::Secs, true));

    base(Kind::Event, &event.metadata, event_type)
        .with_attr("reason", text_or_na(event.reason.as_ref()))
        .with_attr("message", text_or_na(event.message.as_ref()))
        .with_attr("count", event.count.unwrap_or(1))
        .with_attr("last_seen", text_or_na(last_seen.as_ref()))
        .with_attr(
            "object",
            format!(
                "{}/{}",
                event.involved_object.kind.as_deref().unwrap_or_default(),
                event.involved_object.name.as_deref().unwrap_or_default()
            ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::{
        ContainerStatus, NodeCondition, NodeStatus, PersistentVolumeClaimSpec, PodStatus,
        ServicePort, ServiceSpec,
    };
    use chrono::{DateTime, Duration};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::{OwnerReference, Time};

    fn meta(name: &str, namespace: Option<&str>) -> ObjectMeta {
        ObjectMeta {
            name: Some(name.to_string()),
            namespace: namespace.map(str::to_string),
            ..Default::default()
        }
    }

    fn condition(type_: &str, status: &str) -> NodeCondition {
        NodeCondition {
            type_: type_.to_string(),
            status: status.to_string(),
            ..Default::default()
        }
    }

    fn node_with(conditions: Vec<NodeCondition>) -> Node {
        Node {
            metadata: meta("worker-1", None),
            status: Some(NodeStatus {
                conditions: Some(conditions),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_node_ready_among_other_conditions() {
        let n = node_with(vec![
            condition("MemoryPressure", "False"),
            condition("Ready", "True"),
            condition("DiskPressure", "False"),
        ]);
        let record = node(n);
        assert_eq!(record.status, "Ready");
        assert_eq!(record.namespace, NOT_APPLICABLE);
    }

    #[test]
    fn test_node_not_ready() {
        assert_eq!(node(node_with(vec![condition("Ready", "False")])).status, "NotReady");
        assert_eq!(node(node_with(vec![condition("Ready", "Unknown")])).status, "NotReady");
        assert_eq!(
            node(node_with(vec![condition("MemoryPressure", "False")])).status,
            "NotReady"
        );
        // No status at all
        let bare = Node {
            metadata: meta("bare", None),
            ..Default::default()
        };
        assert_eq!(node(bare).status, "NotReady");
    }

    #[test]
    fn test_pod_record() {
        let p = Pod {
            metadata: ObjectMeta {
                owner_references: Some(vec![OwnerReference {
                    kind: "ReplicaSet".to_string(),
                    name: "web-7d9f".to_string(),
                    ..Default::default()
                }]),
                ..meta("web-7d9f-abcde", Some("prod"))
            },
            status: Some(PodStatus {
                phase: Some("Running".to_string()),
                container_statuses: Some(vec![
                    ContainerStatus {
                        name: "app".to_string(),
                        ready: true,
                        restart_count: 2,
                        ..Default::default()
                    },
                    ContainerStatus {
                        name: "sidecar".to_string(),
                        ready: false,
                        restart_count: 1,
                        ..Default::default()
                    },
                ]),
                ..Default::default()
            }),
            ..Default::default()
        };

        let record = pod(p);
        assert_eq!(record.kind, Kind::Pod);
        assert_eq!(record.namespace, "prod");
        assert_eq!(record.status, "Running");
        assert_eq!(record.attr("restarts"), Some(&AttrValue::Count(3)));
        assert_eq!(record.attr_display("ready"), "1/2");
        assert_eq!(record.attr_display("node"), NOT_APPLICABLE);
        assert_eq!(record.owner_references, vec![OwnerRef::new("ReplicaSet", "web-7d9f")]);
    }

    #[test]
    fn test_pod_without_status_is_unknown() {
        let record = pod(Pod {
            metadata: meta("pending", Some("default")),
            ..Default::default()
        });
        assert_eq!(record.status, UNKNOWN);
        assert_eq!(record.attr_display("ready"), "0/0");
    }

    #[test]
    fn test_deployment_missing_replicas_defaults_to_zero() {
        let record = deployment(Deployment {
            metadata: meta("api", Some("prod")),
            ..Default::default()
        });
        assert_eq!(record.status, "Replicas: 0");
        assert_eq!(record.attr("desired_replicas"), Some(&AttrValue::Count(0)));
        assert_eq!(record.attr("ready_replicas"), Some(&AttrValue::Count(0)));
    }

    #[test]
    fn test_service_ports() {
        let record = service(Service {
            metadata: meta("frontend", Some("web")),
            spec: Some(ServiceSpec {
                type_: Some("NodePort".to_string()),
                ports: Some(vec![ServicePort {
                    port: 80,
                    node_port: Some(30080),
                    ..Default::default()
                }]),
                ..Default::default()
            }),
            ..Default::default()
        });
        assert_eq!(record.status, "NodePort");
        assert_eq!(record.attr_display("ports"), "80:30080/TCP");
        assert_eq!(record.attr_display("cluster_ip"), NOT_APPLICABLE);
    }

    #[test]
    fn test_pvc_volume_name() {
        let record = persistent_volume_claim(PersistentVolumeClaim {
            metadata: meta("data", Some("db")),
            spec: Some(PersistentVolumeClaimSpec {
                volume_name: Some("pv-1".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        });
        assert_eq!(record.attr_display("volume_name"), "pv-1");
        assert_eq!(record.attr_display("capacity"), NOT_APPLICABLE);
        assert_eq!(record.status, UNKNOWN);
    }

    #[test]
    fn test_storage_class_default_annotation() {
        let sc = StorageClass {
            metadata: ObjectMeta {
                annotations: Some(BTreeMap::from([(
                    DEFAULT_CLASS_ANNOTATION.to_string(),
                    "true".to_string(),
                )])),
                ..meta("standard", None)
            },
            provisioner: "rancher.io/local-path".to_string(),
            ..Default::default()
        };
        let record = storage_class(sc);
        assert_eq!(record.status, "Default");
        assert_eq!(record.attr_display("provisioner"), "rancher.io/local-path");
    }

    #[test]
    fn test_age_from_creation_timestamp() {
        let record = pod(Pod {
            metadata: ObjectMeta {
                creation_timestamp: Some(Time(Utc::now() - Duration::hours(3))),
                ..meta("web-1", Some("default"))
            },
            ..Default::default()
        });
        assert_eq!(record.attr_display("age"), "3h");
    }

    #[test]
    fn test_age_unknown_without_timestamp() {
        let record = pod(Pod {
            metadata: meta("web-1", Some("default")),
            ..Default::default()
        });
        assert_eq!(record.attr_display("age"), UNKNOWN);
    }

    #[test]
    fn test_created_is_rfc3339() {
        let at = "2024-06-02T11:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let meta = ObjectMeta {
            creation_timestamp: Some(Time(at)),
            ..Default::default()
        };
        assert_eq!(created(&meta).as_deref(), Some("2024-06-02T11:00:00Z"));
    }
}
