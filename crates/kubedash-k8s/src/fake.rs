//! In-memory [`ResourceSource`] for tests

use std::collections::{HashMap, HashSet};

use kubedash_types::{ClusterIdentity, Kind, NormalizedRecord, ResourceDetail, UsageRecord};
use parking_lot::Mutex;

use crate::FetchError;
use crate::source::{ResourceSource, UsageTarget};

pub fn identity() -> ClusterIdentity {
    ClusterIdentity {
        api_server_address: "https://127.0.0.1:6443/".to_string(),
        cluster_name: "test-cluster".to_string(),
    }
}

#[derive(Default)]
pub struct FakeSource {
    records: HashMap<Kind, Vec<NormalizedRecord>>,
    failing: HashSet<Kind>,
    usage: Option<Vec<UsageRecord>>,
    calls: Mutex<Vec<Kind>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: Kind, records: Vec<NormalizedRecord>) -> Self {
        self.records.entry(kind).or_default().extend(records);
        self
    }

    /// Make every call for `kind` fail
    pub fn failing(mut self, kind: Kind) -> Self {
        self.failing.insert(kind);
        self
    }

    pub fn with_usage(mut self, usage: Vec<UsageRecord>) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Kinds listed so far, in call order
    pub fn calls(&self) -> Vec<Kind> {
        self.calls.lock().clone()
    }

    fn check(&self, kind: Kind) -> Result<(), FetchError> {
        self.calls.lock().push(kind);
        if self.failing.contains(&kind) {
            return Err(FetchError::Unavailable(format!("{} listing", kind)));
        }
        Ok(())
    }
}

impl ResourceSource for FakeSource {
    async fn list(
        &self,
        kind: Kind,
        namespace: Option<&str>,
    ) -> Result<Vec<NormalizedRecord>, FetchError> {
        self.check(kind)?;
        Ok(self
            .records
            .get(&kind)
            .into_iter()
            .flatten()
            .filter(|r| match namespace {
                Some(ns) if kind.is_namespaced() => r.namespace == ns,
                _ => true,
            })
            .cloned()
            .collect())
    }

    async fn get(
        &self,
        kind: Kind,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<ResourceDetail, FetchError> {
        self.check(kind)?;
        self.records
            .get(&kind)
            .into_iter()
            .flatten()
            .find(|r| r.name == name && (!kind.is_namespaced() || Some(r.namespace.as_str()) == namespace))
            .map(|r| ResourceDetail::new(r.clone()))
            .ok_or_else(|| FetchError::Unavailable(format!("{} {}", kind, name)))
    }

    async fn events_for(
        &self,
        namespace: &str,
        object_name: &str,
    ) -> Result<Vec<NormalizedRecord>, FetchError> {
        self.check(Kind::Event)?;
        Ok(self
            .records
            .get(&Kind::Event)
            .into_iter()
            .flatten()
            .filter(|e| {
                e.namespace == namespace
                    && e.attr_display("object").ends_with(&format!("/{}", object_name))
            })
            .cloned()
            .collect())
    }

    async fn usage(
        &self,
        _target: UsageTarget,
        _namespace: Option<&str>,
    ) -> Result<Vec<UsageRecord>, FetchError> {
        self.usage
            .clone()
            .ok_or_else(|| FetchError::Unavailable("metrics API".to_string()))
    }
}
