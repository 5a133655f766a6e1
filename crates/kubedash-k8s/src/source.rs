use std::future::Future;

use kubedash_types::{Kind, NormalizedRecord, ResourceDetail, UsageRecord};

use crate::FetchError;

/// Which metrics list to read
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UsageTarget {
    Nodes,
    Pods,
}

/// Read-only access to cluster objects, already normalized.
///
/// [`crate::KubeClient`] talks to a real API server; tests substitute an
/// in-memory implementation.
pub trait ResourceSource: Send + Sync {
    /// List every object of `kind`, restricted to `namespace` for namespaced kinds
    fn list(
        &self,
        kind: Kind,
        namespace: Option<&str>,
    ) -> impl Future<Output = Result<Vec<NormalizedRecord>, FetchError>> + Send;

    /// Read one object with its detail sections
    fn get(
        &self,
        kind: Kind,
        namespace: Option<&str>,
        name: &str,
    ) -> impl Future<Output = Result<ResourceDetail, FetchError>> + Send;

    /// Events whose involved object is `object_name` in `namespace`
    fn events_for(
        &self,
        namespace: &str,
        object_name: &str,
    ) -> impl Future<Output = Result<Vec<NormalizedRecord>, FetchError>> + Send;

    /// Live usage from the metrics API
    fn usage(
        &self,
        target: UsageTarget,
        namespace: Option<&str>,
    ) -> impl Future<Output = Result<Vec<UsageRecord>, FetchError>> + Send;
}
