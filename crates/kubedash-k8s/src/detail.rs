//! Detail pages for single resources

use k8s_openapi::api::apps::v1::{Deployment, StatefulSet};
use k8s_openapi::api::core::v1::{
    Namespace, Node, PersistentVolume, PersistentVolumeClaim, Pod, Secret, Service,
};
use k8s_openapi::api::storage::v1::StorageClass;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kubedash_types::{DetailSection, NOT_APPLICABLE, NormalizedRecord, ResourceDetail};

use crate::normalize::{self, created};

fn detail_from(meta: &ObjectMeta, record: NormalizedRecord) -> ResourceDetail {
    let mut detail = ResourceDetail::new(record);
    detail.created = created(meta);
    detail.labels = meta.labels.clone().unwrap_or_default();
    detail.annotations = meta.annotations.clone().unwrap_or_default();
    detail
}

pub fn node(node: Node) -> ResourceDetail {
    let meta = node.metadata.clone();
    let status = node.status.clone().unwrap_or_default();
    let mut detail = detail_from(&meta, normalize::node(node));

    let mut conditions = DetailSection::new("Conditions");
    for c in status.conditions.iter().flatten() {
        let reason = c.reason.as_deref().unwrap_or_default();
        conditions.push(&c.type_, format!("{} {}", c.status, reason).trim_end().to_string());
    }

    let mut addresses = DetailSection::new("Addresses");
    for a in status.addresses.iter().flatten() {
        addresses.push(&a.type_, &a.address);
    }

    let mut resources = DetailSection::new("Resources");
    for key in ["cpu", "memory", "pods", "ephemeral-storage"] {
        resources.push(
            key,
            format!(
                "{} capacity, {} allocatable",
                normalize::quantity(status.capacity.as_ref(), key),
                normalize::quantity(status.allocatable.as_ref(), key)
            ),
        );
    }

    let mut system = DetailSection::new("System");
    if let Some(info) = &status.node_info {
        system.push("OS image", &info.os_image);
        system.push("Kernel", &info.kernel_version);
        system.push("Architecture", &info.architecture);
        system.push("Container runtime", &info.container_runtime_version);
        system.push("Kubelet", &info.kubelet_version);
    }

    detail.sections = vec![conditions, addresses, resources, system];
    detail
}

pub fn namespace(ns: Namespace) -> ResourceDetail {
    let meta = ns.metadata.clone();
    let finalizers = ns
        .spec
        .as_ref()
        .and_then(|s| s.finalizers.clone())
        .unwrap_or_default();
    let mut detail = detail_from(&meta, normalize::namespace(ns));

    let mut spec = DetailSection::new("Spec");
    spec.push("Finalizers", finalizers.join(", "));
    detail.sections.push(spec);
    detail
}

pub fn pod(pod: Pod) -> ResourceDetail {
    let meta = pod.metadata.clone();
    let spec = pod.spec.clone().unwrap_or_default();
    let status = pod.status.clone().unwrap_or_default();
    let mut detail = detail_from(&meta, normalize::pod(pod));

    let mut overview = DetailSection::new("Overview");
    overview.push("Node", spec.node_name.as_deref().unwrap_or(NOT_APPLICABLE));
    overview.push("Host IP", status.host_ip.as_deref().unwrap_or(NOT_APPLICABLE));
    overview.push("Pod IP", status.pod_ip.as_deref().unwrap_or(NOT_APPLICABLE));
    overview.push("QoS class", status.qos_class.as_deref().unwrap_or(NOT_APPLICABLE));
    overview.push(
        "Service account",
        spec.service_account_name.as_deref().unwrap_or("default"),
    );

    let mut containers = DetailSection::new("Containers");
    let statuses = status.container_statuses.unwrap_or_default();
    for c in &spec.containers {
        let image = c.image.as_deref().unwrap_or(NOT_APPLICABLE);
        let line = match statuses.iter().find(|s| s.name == c.name) {
            Some(s) => format!(
                "{} (ready: {}, restarts: {})",
                image, s.ready, s.restart_count
            ),
            None => image.to_string(),
        };
        containers.push(&c.name, line);
    }

    let mut conditions = DetailSection::new("Conditions");
    for c in status.conditions.iter().flatten() {
        conditions.push(&c.type_, &c.status);
    }

    detail.sections = vec![overview, containers, conditions];
    detail
}

fn selector_text(labels: Option<&std::collections::BTreeMap<String, String>>) -> String {
    let pairs: Vec<String> = labels
        .iter()
        .flat_map(|m| m.iter())
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();
    if pairs.is_empty() {
        NOT_APPLICABLE.to_string()
    } else {
        pairs.join(",")
    }
}

pub fn deployment(deploy: Deployment) -> ResourceDetail {
    let meta = deploy.metadata.clone();
    let spec = deploy.spec.clone().unwrap_or_default();
    let status = deploy.status.clone().unwrap_or_default();
    let mut detail = detail_from(&meta, normalize::deployment(deploy));

    let mut replicas = DetailSection::new("Replicas");
    replicas.push("Desired", spec.replicas.unwrap_or(0).to_string());
    replicas.push("Updated", status.updated_replicas.unwrap_or(0).to_string());
    replicas.push("Ready", status.ready_replicas.unwrap_or(0).to_string());
    replicas.push("Available", status.available_replicas.unwrap_or(0).to_string());
    replicas.push(
        "Unavailable",
        status.unavailable_replicas.unwrap_or(0).to_string(),
    );

    let mut template = DetailSection::new("Template");
    template.push("Selector", selector_text(spec.selector.match_labels.as_ref()));
    for c in spec.template.spec.iter().flat_map(|s| s.containers.iter()) {
        template.push(&c.name, c.image.as_deref().unwrap_or(NOT_APPLICABLE));
    }

    let mut conditions = DetailSection::new("Conditions");
    for c in status.conditions.iter().flatten() {
        let message = c.message.as_deref().unwrap_or_default();
        conditions.push(&c.type_, format!("{} {}", c.status, message).trim_end().to_string());
    }

    detail.sections = vec![replicas, template, conditions];
    detail
}

pub fn stateful_set(sts: StatefulSet) -> ResourceDetail {
    let meta = sts.metadata.clone();
    let spec = sts.spec.clone().unwrap_or_default();
    let status = sts.status.clone().unwrap_or_default();
    let mut detail = detail_from(&meta, normalize::stateful_set(sts));

    let mut replicas = DetailSection::new("Replicas");
    replicas.push("Desired", spec.replicas.unwrap_or(0).to_string());
    replicas.push("Current", status.current_replicas.unwrap_or(0).to_string());
    replicas.push("Ready", status.ready_replicas.unwrap_or(0).to_string());

    let mut template = DetailSection::new("Template");
    template.push("Selector", selector_text(spec.selector.match_labels.as_ref()));
    for c in spec.template.spec.iter().flat_map(|s| s.containers.iter()) {
        template.push(&c.name, c.image.as_deref().unwrap_or(NOT_APPLICABLE));
    }

    detail.sections = vec![replicas, template];
    detail
}

pub fn service(svc: Service) -> ResourceDetail {
    let meta = svc.metadata.clone();
    let spec = svc.spec.clone().unwrap_or_default();
    let mut detail = detail_from(&meta, normalize::service(svc));

    let mut overview = DetailSection::new("Overview");
    overview.push("Type", spec.type_.as_deref().unwrap_or("ClusterIP"));
    overview.push("Cluster IP", spec.cluster_ip.as_deref().unwrap_or(NOT_APPLICABLE));
    overview.push(
        "External IPs",
        spec.external_ips
            .as_ref()
            .map(|ips| ips.join(", "))
            .unwrap_or_else(|| NOT_APPLICABLE.to_string()),
    );
    overview.push("Selector", selector_text(spec.selector.as_ref()));

    let mut ports = DetailSection::new("Ports");
    for p in spec.ports.iter().flatten() {
        let target = p
            .target_port
            .as_ref()
            .map(|t| match t {
                k8s_openapi::apimachinery::pkg::util::intstr::IntOrString::Int(n) => n.to_string(),
                k8s_openapi::apimachinery::pkg::util::intstr::IntOrString::String(s) => s.clone(),
            })
            .unwrap_or_else(|| p.port.to_string());
        let name = p.name.clone().unwrap_or_else(|| p.port.to_string());
        ports.push(
            name,
            format!(
                "{} -> {}/{}",
                p.port,
                target,
                p.protocol.as_deref().unwrap_or("TCP")
            ),
        );
    }

    detail.sections = vec![overview, ports];
    detail
}

/// Secret details list key names and sizes; values are never exposed.
pub fn secret(secret: Secret) -> ResourceDetail {
    let meta = secret.metadata.clone();
    let data = secret.data.clone().unwrap_or_default();
    let mut detail = detail_from(&meta, normalize::secret(secret));

    let mut keys = DetailSection::new("Data");
    for (key, value) in &data {
        keys.push(key, format!("{} bytes", value.0.len()));
    }

    detail.sections = vec![keys];
    detail
}

pub fn storage_class(sc: StorageClass) -> ResourceDetail {
    let meta = sc.metadata.clone();
    let parameters = sc.parameters.clone().unwrap_or_default();
    let mount_options = sc.mount_options.clone().unwrap_or_default();
    let mut detail = detail_from(&meta, normalize::storage_class(sc));

    let mut params = DetailSection::new("Parameters");
    for (key, value) in &parameters {
        params.push(key, value);
    }

    let mut mounts = DetailSection::new("Mount options");
    mounts.push("Options", mount_options.join(", "));

    detail.sections = vec![params, mounts];
    detail
}

pub fn persistent_volume(pv: PersistentVolume) -> ResourceDetail {
    let meta = pv.metadata.clone();
    let spec = pv.spec.clone().unwrap_or_default();
    let mut detail = detail_from(&meta, normalize::persistent_volume(pv));

    let mut source = DetailSection::new("Source");
    if let Some(csi) = &spec.csi {
        source.push("CSI driver", &csi.driver);
        source.push("Volume handle", &csi.volume_handle);
    }
    if let Some(host_path) = &spec.host_path {
        source.push("Host path", &host_path.path);
    }
    if let Some(nfs) = &spec.nfs {
        source.push("NFS", format!("{}:{}", nfs.server, nfs.path));
    }
    if let Some(local) = &spec.local {
        source.push("Local path", &local.path);
    }

    let mut status = DetailSection::new("Status");
    status.push("Phase", detail.record.status.clone());
    status.push("Claim", detail.record.attr_display("claim"));

    detail.sections = vec![source, status];
    detail
}

pub fn persistent_volume_claim(pvc: PersistentVolumeClaim) -> ResourceDetail {
    let meta = pvc.metadata.clone();
    let spec = pvc.spec.clone().unwrap_or_default();
    let mut detail = detail_from(&meta, normalize::persistent_volume_claim(pvc));

    let mut claim = DetailSection::new("Claim");
    claim.push("Volume", detail.record.attr_display("volume_name"));
    claim.push("Storage class", detail.record.attr_display("storage_class"));
    claim.push("Capacity", detail.record.attr_display("capacity"));
    claim.push(
        "Volume mode",
        spec.volume_mode.as_deref().unwrap_or("Filesystem"),
    );

    detail.sections = vec![claim];
    detail
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};
    use k8s_openapi::ByteString;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
    use std::collections::BTreeMap;

    #[test]
    fn test_secret_detail_hides_values() {
        let secret = Secret {
            metadata: ObjectMeta {
                name: Some("db-creds".to_string()),
                namespace: Some("prod".to_string()),
                ..Default::default()
            },
            data: Some(BTreeMap::from([(
                "password".to_string(),
                ByteString(b"hunter2".to_vec()),
            )])),
            ..Default::default()
        };

        let detail = super::secret(secret);
        assert_eq!(detail.record.attr_display("keys"), "1");
        let data = &detail.sections[0];
        assert_eq!(data.entries, vec![("password".to_string(), "7 bytes".to_string())]);
        let rendered = serde_json::to_string(&detail).unwrap();
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_detail_carries_labels() {
        let ns = Namespace {
            metadata: ObjectMeta {
                name: Some("webapp".to_string()),
                labels: Some(BTreeMap::from([("team".to_string(), "web".to_string())])),
                ..Default::default()
            },
            ..Default::default()
        };

        let detail = super::namespace(ns);
        assert_eq!(detail.record.name, "webapp");
        assert_eq!(detail.labels.get("team").map(String::as_str), Some("web"));
        assert!(detail.created.is_none());
    }

    #[test]
    fn test_detail_created_is_rfc3339() {
        let ns = Namespace {
            metadata: ObjectMeta {
                name: Some("webapp".to_string()),
                creation_timestamp: Some(Time(Utc::now() - Duration::days(2))),
                ..Default::default()
            },
            ..Default::default()
        };

        let detail = super::namespace(ns);
        let created = detail.created.expect("creation time");
        assert!(created.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&created).is_ok());
        assert_eq!(detail.record.attr_display("age"), "2d");
    }
}
