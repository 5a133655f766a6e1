//! Cluster summary counts

use kubedash_types::{ClusterSummary, HealthStatus, Kind, NormalizedRecord};
use tracing::warn;

use crate::dashboard::Dashboard;
use crate::source::ResourceSource;

impl<S: ResourceSource> Dashboard<S> {
    /// Reduce fresh listings to the landing-page counts.
    ///
    /// Each count is isolated: a failed listing zeroes only its own field,
    /// and a failed node listing reports [`HealthStatus::Unknown`].
    pub async fn summarize(&self) -> ClusterSummary {
        let identity = self.identity().clone();

        let (total_nodes, healthy_nodes, health_status) =
            match self.source().list(Kind::Node, None).await {
                Ok(nodes) => {
                    let healthy = nodes.iter().filter(|n| is_ready(n)).count();
                    (
                        nodes.len(),
                        healthy,
                        HealthStatus::from_counts(nodes.len(), healthy),
                    )
                }
                Err(e) => {
                    warn!(error = %e, "node listing failed, health unknown");
                    (0, 0, HealthStatus::Unknown)
                }
            };

        ClusterSummary {
            api_server_address: identity.api_server_address,
            cluster_name: identity.cluster_name,
            total_nodes,
            healthy_nodes,
            health_status,
            total_pods: self.count(Kind::Pod).await,
            total_namespaces: self.count(Kind::Namespace).await,
            total_deployments: self.count(Kind::Deployment).await,
            total_services: self.count(Kind::Service).await,
        }
    }

    async fn count(&self, kind: Kind) -> usize {
        self.fetch(kind, None).await.len()
    }
}

fn is_ready(node: &NormalizedRecord) -> bool {
    node.status == "Ready"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeSource, identity};

    fn node(name: &str, status: &str) -> NormalizedRecord {
        NormalizedRecord::new(Kind::Node, name, None, status)
    }

    fn many(kind: Kind, n: usize) -> Vec<NormalizedRecord> {
        (0..n)
            .map(|i| NormalizedRecord::new(kind, format!("{}-{}", kind, i), Some("default".to_string()), ""))
            .collect()
    }

    fn cluster() -> FakeSource {
        FakeSource::new()
            .with(Kind::Node, vec![node("a", "Ready"), node("b", "Ready"), node("c", "NotReady")])
            .with(Kind::Pod, many(Kind::Pod, 7))
            .with(Kind::Namespace, many(Kind::Namespace, 4))
            .with(Kind::Deployment, many(Kind::Deployment, 3))
            .with(Kind::Service, many(Kind::Service, 2))
    }

    #[tokio::test]
    async fn test_summary_counts() {
        let summary = Dashboard::new(cluster(), identity()).summarize().await;

        assert_eq!(summary.cluster_name, "test-cluster");
        assert_eq!(summary.api_server_address, "https://127.0.0.1:6443/");
        assert_eq!(summary.total_nodes, 3);
        assert_eq!(summary.healthy_nodes, 2);
        assert_eq!(summary.health_status, HealthStatus::Unhealthy);
        assert_eq!(summary.total_pods, 7);
        assert_eq!(summary.total_namespaces, 4);
        assert_eq!(summary.total_deployments, 3);
        assert_eq!(summary.total_services, 2);
    }

    #[tokio::test]
    async fn test_all_ready_is_healthy() {
        let source = FakeSource::new().with(Kind::Node, vec![node("a", "Ready")]);
        let summary = Dashboard::new(source, identity()).summarize().await;
        assert_eq!(summary.health_status, HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn test_node_failure_only_degrades_node_fields() {
        let source = cluster().failing(Kind::Node);
        let summary = Dashboard::new(source, identity()).summarize().await;

        assert_eq!(summary.health_status, HealthStatus::Unknown);
        assert_eq!(summary.total_nodes, 0);
        assert_eq!(summary.healthy_nodes, 0);
        assert_eq!(summary.total_pods, 7);
        assert_eq!(summary.total_namespaces, 4);
        assert_eq!(summary.total_deployments, 3);
        assert_eq!(summary.total_services, 2);
    }

    #[tokio::test]
    async fn test_pod_failure_zeroes_pod_count() {
        let source = cluster().failing(Kind::Pod);
        let summary = Dashboard::new(source, identity()).summarize().await;

        assert_eq!(summary.total_pods, 0);
        assert_eq!(summary.health_status, HealthStatus::Unhealthy);
        assert_eq!(summary.total_services, 2);
    }

    #[tokio::test]
    async fn test_empty_cluster_reports_healthy() {
        let summary = Dashboard::new(FakeSource::new(), identity()).summarize().await;
        assert_eq!(summary.total_nodes, 0);
        assert_eq!(summary.health_status, HealthStatus::Healthy);
    }
}
