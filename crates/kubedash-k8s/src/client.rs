//! Kubernetes client for kubedash

use std::fmt::Debug;

use anyhow::{Context, Result};
use k8s_openapi::api::apps::v1::{Deployment, ReplicaSet, StatefulSet};
use k8s_openapi::api::core::v1::{
    Event, Namespace, Node, PersistentVolume, PersistentVolumeClaim, Pod, Secret, Service,
};
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding};
use k8s_openapi::api::storage::v1::StorageClass;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use k8s_openapi::{ClusterResourceScope, NamespaceResourceScope};
use kube::Api;
use kube::api::{ApiResource, DynamicObject, ListParams};
use kube::config::KubeConfigOptions;
use kubedash_types::{ClusterIdentity, Kind, NOT_APPLICABLE, NormalizedRecord, ResourceDetail, UsageRecord};
use serde_json::Value;
use tracing::debug;

use crate::source::{ResourceSource, UsageTarget};
use crate::units::{parse_cpu, parse_memory};
use crate::{FetchError, detail, normalize};

/// Kubernetes client wrapper.
///
/// Configuration is resolved once in [`KubeClient::connect`]; the handle is
/// immutable afterwards and cheap to share.
pub struct KubeClient {
    client: kube::Client,
    identity: ClusterIdentity,
}

impl KubeClient {
    /// Build a client from the given kubeconfig context, or infer one
    /// (local kubeconfig first, then in-cluster service account).
    pub async fn connect(context: Option<&str>, cluster_name: String) -> Result<Self> {
        let config = match context {
            Some(context_name) => kube::Config::from_kubeconfig(&KubeConfigOptions {
                context: Some(context_name.to_string()),
                ..Default::default()
            })
            .await
            .context(format!(
                "Failed to create config for context: {}",
                context_name
            ))?,
            None => kube::Config::infer()
                .await
                .context("Failed to load Kubernetes config. Is kubectl configured?")?,
        };

        let identity = ClusterIdentity {
            api_server_address: config.cluster_url.to_string(),
            cluster_name,
        };

        let client =
            kube::Client::try_from(config).context("Failed to create Kubernetes client")?;

        Ok(Self { client, identity })
    }

    pub fn identity(&self) -> &ClusterIdentity {
        &self.identity
    }

    /// List a namespaced kind in one namespace, or across all of them
    async fn list_namespaced<K>(
        &self,
        namespace: Option<&str>,
        normalize: fn(K) -> NormalizedRecord,
    ) -> Result<Vec<NormalizedRecord>, FetchError>
    where
        K: kube::Resource<Scope = NamespaceResourceScope>
            + Clone
            + serde::de::DeserializeOwned
            + Debug,
        K::DynamicType: Default,
    {
        let api: Api<K> = match namespace {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        };
        let list = api.list(&ListParams::default()).await?;
        Ok(list.items.into_iter().map(normalize).collect())
    }

    /// List a cluster-scoped kind
    async fn list_cluster<K>(
        &self,
        normalize: fn(K) -> NormalizedRecord,
    ) -> Result<Vec<NormalizedRecord>, FetchError>
    where
        K: kube::Resource<Scope = ClusterResourceScope>
            + Clone
            + serde::de::DeserializeOwned
            + Debug,
        K::DynamicType: Default,
    {
        let api: Api<K> = Api::all(self.client.clone());
        let list = api.list(&ListParams::default()).await?;
        Ok(list.items.into_iter().map(normalize).collect())
    }

    async fn get_namespaced<K>(
        &self,
        namespace: Option<&str>,
        name: &str,
        to_detail: fn(K) -> ResourceDetail,
    ) -> Result<ResourceDetail, FetchError>
    where
        K: kube::Resource<Scope = NamespaceResourceScope>
            + Clone
            + serde::de::DeserializeOwned
            + Debug,
        K::DynamicType: Default,
    {
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace.unwrap_or("default"));
        Ok(to_detail(api.get(name).await?))
    }

    async fn get_cluster<K>(
        &self,
        name: &str,
        to_detail: fn(K) -> ResourceDetail,
    ) -> Result<ResourceDetail, FetchError>
    where
        K: kube::Resource<Scope = ClusterResourceScope>
            + Clone
            + serde::de::DeserializeOwned
            + Debug,
        K::DynamicType: Default,
    {
        let api: Api<K> = Api::all(self.client.clone());
        Ok(to_detail(api.get(name).await?))
    }
}

/// `metrics.k8s.io` resource for node or pod metrics
fn metrics_resource(target: UsageTarget) -> ApiResource {
    let (kind, plural) = match target {
        UsageTarget::Nodes => ("NodeMetrics", "nodes"),
        UsageTarget::Pods => ("PodMetrics", "pods"),
    };
    ApiResource {
        group: "metrics.k8s.io".to_string(),
        version: "v1beta1".to_string(),
        api_version: "metrics.k8s.io/v1beta1".to_string(),
        kind: kind.to_string(),
        plural: plural.to_string(),
    }
}

/// Read `{cpu, memory}` out of a metrics `usage` object
fn parse_usage(usage: &Value) -> (Option<f64>, Option<f64>) {
    let cpu = usage
        .get("cpu")
        .and_then(Value::as_str)
        .and_then(|q| parse_cpu(q).ok());
    let memory = usage
        .get("memory")
        .and_then(Value::as_str)
        .and_then(|q| parse_memory(q).ok());
    (cpu, memory)
}

/// Convert a NodeMetrics/PodMetrics object; pod usage is summed over containers.
pub(crate) fn usage_record(object: &DynamicObject, target: UsageTarget) -> UsageRecord {
    let (cpu_cores, memory_mib) = match target {
        UsageTarget::Nodes => object
            .data
            .get("usage")
            .map(parse_usage)
            .unwrap_or((None, None)),
        UsageTarget::Pods => object
            .data
            .get("containers")
            .and_then(Value::as_array)
            .map(|containers| {
                containers
                    .iter()
                    .filter_map(|c| c.get("usage"))
                    .map(parse_usage)
                    .fold((None, None), |(cpu, mem), (c, m)| {
                        (add(cpu, c), add(mem, m))
                    })
            })
            .unwrap_or((None, None)),
    };

    UsageRecord {
        name: object.metadata.name.clone().unwrap_or_default(),
        namespace: match target {
            UsageTarget::Nodes => NOT_APPLICABLE.to_string(),
            UsageTarget::Pods => object.metadata.namespace.clone().unwrap_or_default(),
        },
        cpu_cores,
        memory_mib,
    }
}

fn add(total: Option<f64>, value: Option<f64>) -> Option<f64> {
    match (total, value) {
        (Some(t), Some(v)) => Some(t + v),
        (t, v) => t.or(v),
    }
}

impl ResourceSource for KubeClient {
    async fn list(
        &self,
        kind: Kind,
        namespace: Option<&str>,
    ) -> Result<Vec<NormalizedRecord>, FetchError> {
        let records = match kind {
            Kind::Node => self.list_cluster::<Node>(normalize::node).await?,
            Kind::Namespace => self.list_cluster::<Namespace>(normalize::namespace).await?,
            Kind::Pod => self.list_namespaced::<Pod>(namespace, normalize::pod).await?,
            Kind::Deployment => {
                self.list_namespaced::<Deployment>(namespace, normalize::deployment)
                    .await?
            }
            Kind::StatefulSet => {
                self.list_namespaced::<StatefulSet>(namespace, normalize::stateful_set)
                    .await?
            }
            Kind::ReplicaSet => {
                self.list_namespaced::<ReplicaSet>(namespace, normalize::replica_set)
                    .await?
            }
            Kind::Service => {
                self.list_namespaced::<Service>(namespace, normalize::service)
                    .await?
            }
            Kind::Secret => self.list_namespaced::<Secret>(namespace, normalize::secret).await?,
            Kind::StorageClass => {
                self.list_cluster::<StorageClass>(normalize::storage_class)
                    .await?
            }
            Kind::PersistentVolume => {
                self.list_cluster::<PersistentVolume>(normalize::persistent_volume)
                    .await?
            }
            Kind::PersistentVolumeClaim => {
                self.list_namespaced::<PersistentVolumeClaim>(
                    namespace,
                    normalize::persistent_volume_claim,
                )
                .await?
            }
            Kind::CustomResourceDefinition => {
                self.list_cluster::<CustomResourceDefinition>(
                    normalize::custom_resource_definition,
                )
                .await?
            }
            Kind::ClusterRole => {
                self.list_cluster::<ClusterRole>(normalize::cluster_role)
                    .await?
            }
            Kind::ClusterRoleBinding => {
                self.list_cluster::<ClusterRoleBinding>(normalize::cluster_role_binding)
                    .await?
            }
            Kind::Event => self.list_namespaced::<Event>(namespace, normalize::event).await?,
        };

        debug!(kind = %kind, count = records.len(), "listed resources");
        Ok(records)
    }

    async fn get(
        &self,
        kind: Kind,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<ResourceDetail, FetchError> {
        match kind {
            Kind::Node => self.get_cluster::<Node>(name, detail::node).await,
            Kind::Namespace => self.get_cluster::<Namespace>(name, detail::namespace).await,
            Kind::Pod => self.get_namespaced::<Pod>(namespace, name, detail::pod).await,
            Kind::Deployment => {
                self.get_namespaced::<Deployment>(namespace, name, detail::deployment)
                    .await
            }
            Kind::StatefulSet => {
                self.get_namespaced::<StatefulSet>(namespace, name, detail::stateful_set)
                    .await
            }
            Kind::Service => {
                self.get_namespaced::<Service>(namespace, name, detail::service)
                    .await
            }
            Kind::Secret => {
                self.get_namespaced::<Secret>(namespace, name, detail::secret)
                    .await
            }
            Kind::StorageClass => {
                self.get_cluster::<StorageClass>(name, detail::storage_class)
                    .await
            }
            Kind::PersistentVolume => {
                self.get_cluster::<PersistentVolume>(name, detail::persistent_volume)
                    .await
            }
            Kind::PersistentVolumeClaim => {
                self.get_namespaced::<PersistentVolumeClaim>(
                    namespace,
                    name,
                    detail::persistent_volume_claim,
                )
                .await
            }
            other => Err(FetchError::Unsupported(other)),
        }
    }

    async fn events_for(
        &self,
        namespace: &str,
        object_name: &str,
    ) -> Result<Vec<NormalizedRecord>, FetchError> {
        let api: Api<Event> = Api::namespaced(self.client.clone(), namespace);
        let params =
            ListParams::default().fields(&format!("involvedObject.name={}", object_name));
        let list = api.list(&params).await?;
        Ok(list.items.into_iter().map(normalize::event).collect())
    }

    async fn usage(
        &self,
        target: UsageTarget,
        namespace: Option<&str>,
    ) -> Result<Vec<UsageRecord>, FetchError> {
        let resource = metrics_resource(target);
        let api: Api<DynamicObject> = match (target, namespace) {
            (UsageTarget::Pods, Some(ns)) => {
                Api::namespaced_with(self.client.clone(), ns, &resource)
            }
            _ => Api::all_with(self.client.clone(), &resource),
        };

        let list = api.list(&ListParams::default()).await.map_err(|e| {
            let err = FetchError::from(e);
            if err.is_not_found() {
                FetchError::Unavailable("metrics API".to_string())
            } else {
                err
            }
        })?;

        Ok(list
            .items
            .iter()
            .map(|object| usage_record(object, target))
            .collect())
    }
}
