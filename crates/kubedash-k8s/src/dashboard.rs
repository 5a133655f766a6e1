//! Per-kind fetchers with fault containment
//!
//! Bulk fetches never fail: an API fault is logged and becomes an empty
//! collection. Detail lookups return an [`ErrorRecord`] instead.

use kubedash_types::{
    ClusterIdentity, ErrorRecord, Kind, NormalizedRecord, ResourceDetail, UsageRecord,
    VolumeBinding,
};
use tracing::warn;

use crate::correlate::{correlate_namespace_counts, correlate_owner, correlate_pv_pvc};
use crate::source::{ResourceSource, UsageTarget};

/// Entry point for everything the views ask of the cluster.
///
/// Owns the injected [`ResourceSource`] for the lifetime of the process.
pub struct Dashboard<S> {
    source: S,
    identity: ClusterIdentity,
}

impl<S: ResourceSource> Dashboard<S> {
    pub fn new(source: S, identity: ClusterIdentity) -> Self {
        Self { source, identity }
    }

    pub fn identity(&self) -> &ClusterIdentity {
        &self.identity
    }

    pub(crate) fn source(&self) -> &S {
        &self.source
    }

    /// List one kind, degrading any failure to an empty collection
    pub async fn fetch(&self, kind: Kind, namespace: Option<&str>) -> Vec<NormalizedRecord> {
        match self.source.list(kind, namespace).await {
            Ok(records) => records,
            Err(e) => {
                warn!(
                    kind = %kind,
                    namespace = namespace.unwrap_or("*"),
                    error = %e,
                    "fetch failed, treating as empty"
                );
                Vec::new()
            }
        }
    }

    /// List one kind the way its own view shows it, correlated where the view needs it
    pub async fn fetch_view(&self, kind: Kind, namespace: Option<&str>) -> Vec<NormalizedRecord> {
        match kind {
            Kind::Pod => self.fetch_pods(namespace).await,
            Kind::Namespace => self.fetch_namespaces_with_counts().await,
            other => self.fetch(other, namespace).await,
        }
    }

    pub async fn fetch_nodes(&self) -> Vec<NormalizedRecord> {
        self.fetch(Kind::Node, None).await
    }

    pub async fn fetch_namespaces(&self) -> Vec<NormalizedRecord> {
        self.fetch(Kind::Namespace, None).await
    }

    /// Pods with `desired_replicas`/`ready_replicas` from their controllers
    pub async fn fetch_pods(&self, namespace: Option<&str>) -> Vec<NormalizedRecord> {
        let pods = self.fetch(Kind::Pod, namespace).await;
        if pods.is_empty() {
            return pods;
        }

        let mut controllers = self.fetch_replica_sets(namespace).await;
        controllers.extend(self.fetch_deployments(namespace).await);
        controllers.extend(self.fetch_stateful_sets(namespace).await);

        correlate_owner(pods, &controllers)
    }

    pub async fn fetch_deployments(&self, namespace: Option<&str>) -> Vec<NormalizedRecord> {
        self.fetch(Kind::Deployment, namespace).await
    }

    pub async fn fetch_stateful_sets(&self, namespace: Option<&str>) -> Vec<NormalizedRecord> {
        self.fetch(Kind::StatefulSet, namespace).await
    }

    pub async fn fetch_replica_sets(&self, namespace: Option<&str>) -> Vec<NormalizedRecord> {
        self.fetch(Kind::ReplicaSet, namespace).await
    }

    pub async fn fetch_services(&self, namespace: Option<&str>) -> Vec<NormalizedRecord> {
        self.fetch(Kind::Service, namespace).await
    }

    pub async fn fetch_secrets(&self, namespace: Option<&str>) -> Vec<NormalizedRecord> {
        self.fetch(Kind::Secret, namespace).await
    }

    pub async fn fetch_storage_classes(&self) -> Vec<NormalizedRecord> {
        self.fetch(Kind::StorageClass, None).await
    }

    pub async fn fetch_persistent_volumes(&self) -> Vec<NormalizedRecord> {
        self.fetch(Kind::PersistentVolume, None).await
    }

    pub async fn fetch_persistent_volume_claims(
        &self,
        namespace: Option<&str>,
    ) -> Vec<NormalizedRecord> {
        self.fetch(Kind::PersistentVolumeClaim, namespace).await
    }

    pub async fn fetch_custom_resource_definitions(&self) -> Vec<NormalizedRecord> {
        self.fetch(Kind::CustomResourceDefinition, None).await
    }

    pub async fn fetch_cluster_roles(&self) -> Vec<NormalizedRecord> {
        self.fetch(Kind::ClusterRole, None).await
    }

    pub async fn fetch_cluster_role_bindings(&self) -> Vec<NormalizedRecord> {
        self.fetch(Kind::ClusterRoleBinding, None).await
    }

    /// Namespaces with pod, deployment and service counts attached
    pub async fn fetch_namespaces_with_counts(&self) -> Vec<NormalizedRecord> {
        let namespaces = self.fetch_namespaces().await;
        if namespaces.is_empty() {
            return namespaces;
        }

        let pods = self.fetch(Kind::Pod, None).await;
        let deployments = self.fetch_deployments(None).await;
        let services = self.fetch_services(None).await;

        correlate_namespace_counts(namespaces, &pods, &deployments, &services)
    }

    /// Every PVC paired with the PV it claims
    pub async fn fetch_volume_bindings(&self, namespace: Option<&str>) -> Vec<VolumeBinding> {
        let pvs = self.fetch_persistent_volumes().await;
        let pvcs = self.fetch_persistent_volume_claims(namespace).await;
        correlate_pv_pvc(&pvs, &pvcs)
    }

    /// Events involving one pod, oldest first as the API returns them
    pub async fn fetch_pod_events(&self, namespace: &str, pod: &str) -> Vec<NormalizedRecord> {
        match self.source.events_for(namespace, pod).await {
            Ok(events) => events,
            Err(e) => {
                warn!(namespace, pod, error = %e, "event fetch failed, treating as empty");
                Vec::new()
            }
        }
    }

    /// Single-resource lookup; failures become `{error: message}`
    pub async fn detail(
        &self,
        kind: Kind,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<ResourceDetail, ErrorRecord> {
        self.source
            .get(kind, namespace, name)
            .await
            .map_err(|e| {
                warn!(kind = %kind, name, error = %e, "detail lookup failed");
                ErrorRecord::new(e.to_string())
            })
    }

    /// Node usage sorted by CPU, or the single "N/A" record without metrics
    pub async fn top_nodes(&self) -> Vec<UsageRecord> {
        self.top(UsageTarget::Nodes, None).await
    }

    /// Pod usage sorted by CPU, or the single "N/A" record without metrics
    pub async fn top_pods(&self, namespace: Option<&str>) -> Vec<UsageRecord> {
        self.top(UsageTarget::Pods, namespace).await
    }

    async fn top(&self, target: UsageTarget, namespace: Option<&str>) -> Vec<UsageRecord> {
        match self.source.usage(target, namespace).await {
            Ok(mut records) if !records.is_empty() => {
                records.sort_by(|a, b| {
                    b.cpu_cores
                        .unwrap_or(0.0)
                        .total_cmp(&a.cpu_cores.unwrap_or(0.0))
                        .then_with(|| a.name.cmp(&b.name))
                });
                records
            }
            Ok(_) => vec![UsageRecord::unavailable()],
            Err(e) => {
                warn!(metrics = ?target, error = %e, "metrics unavailable");
                vec![UsageRecord::unavailable()]
            }
        }
    }
}
