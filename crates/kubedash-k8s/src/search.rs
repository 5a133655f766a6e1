//! Cross-kind keyword search

use kubedash_types::{Kind, NormalizedRecord};
use tracing::debug;

use crate::dashboard::Dashboard;
use crate::source::ResourceSource;

/// Whether `record` matches the lowercased `needle`: its name contains it,
/// or (for namespaced kinds) its namespace does.
fn matches(record: &NormalizedRecord, needle: &str) -> bool {
    record.name.to_lowercase().contains(needle)
        || (record.kind.is_namespaced() && record.namespace.to_lowercase().contains(needle))
}

impl<S: ResourceSource> Dashboard<S> {
    /// Case-insensitive substring search over every searchable kind.
    ///
    /// Matches are grouped by kind in [`Kind::SEARCHABLE`] order. A blank
    /// query returns nothing without touching the cluster; a failing kind
    /// contributes nothing and the rest are still searched.
    pub async fn search(&self, query: &str) -> Vec<NormalizedRecord> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut results = Vec::new();
        for kind in Kind::SEARCHABLE {
            let before = results.len();
            results.extend(
                self.fetch(kind, None)
                    .await
                    .into_iter()
                    .filter(|r| matches(r, &needle)),
            );
            debug!(kind = %kind, matches = results.len() - before, "searched");
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeSource, identity};

    fn rec(kind: Kind, name: &str, ns: &str) -> NormalizedRecord {
        NormalizedRecord::new(kind, name, Some(ns.to_string()), "")
    }

    fn populated() -> FakeSource {
        FakeSource::new()
            .with(Kind::Namespace, vec![rec(Kind::Namespace, "webapp", ""), rec(Kind::Namespace, "data", "")])
            .with(
                Kind::Pod,
                vec![rec(Kind::Pod, "Web-Frontend-1", "default"), rec(Kind::Pod, "db-worker", "data")],
            )
            .with(Kind::Service, vec![rec(Kind::Service, "web-svc", "default")])
            .with(Kind::Secret, vec![rec(Kind::Secret, "web-tls", "default")])
            .with(Kind::Node, vec![rec(Kind::Node, "worker-x1", "")])
    }

    #[tokio::test]
    async fn test_case_insensitive_substring() {
        let dashboard = Dashboard::new(populated(), identity());

        let results = dashboard.search("web").await;
        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        assert!(names.contains(&"Web-Frontend-1"));
        assert!(names.contains(&"webapp"));
        assert!(!names.contains(&"db-worker"));
    }

    #[tokio::test]
    async fn test_results_follow_kind_order() {
        let dashboard = Dashboard::new(populated(), identity());

        let kinds: Vec<Kind> = dashboard.search("WEB").await.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![Kind::Namespace, Kind::Pod, Kind::Service, Kind::Secret]);
    }

    #[tokio::test]
    async fn test_namespace_match_for_namespaced_kinds() {
        let dashboard = Dashboard::new(populated(), identity());

        let results = dashboard.search("data").await;
        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        // The "data" namespace itself plus the pod living in it
        assert_eq!(names, vec!["data", "db-worker"]);
    }

    #[tokio::test]
    async fn test_blank_query_makes_no_calls() {
        let dashboard = Dashboard::new(populated(), identity());

        assert!(dashboard.search("").await.is_empty());
        assert!(dashboard.search("   \t").await.is_empty());
        assert!(dashboard.source().calls().is_empty());
    }

    #[tokio::test]
    async fn test_query_is_trimmed() {
        let dashboard = Dashboard::new(populated(), identity());

        assert_eq!(dashboard.search("  frontend ").await.len(), 1);
    }

    #[tokio::test]
    async fn test_failing_kind_does_not_abort_search() {
        let dashboard = Dashboard::new(populated().failing(Kind::Secret), identity());

        let results = dashboard.search("x").await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "worker-x1");

        let results = dashboard.search("web").await;
        assert!(results.iter().all(|r| r.kind != Kind::Secret));
        assert_eq!(results.len(), 3);

        // Every searchable kind was still queried on both runs
        assert_eq!(dashboard.source().calls().len(), 2 * Kind::SEARCHABLE.len());
    }
}
