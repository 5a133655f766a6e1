//! Kubernetes resource aggregation for kubedash
//!
//! This crate reads cluster state through a [`ResourceSource`], normalizes
//! every kind into [`NormalizedRecord`]s, correlates related collections and
//! builds the search results and summary the views display.

mod client;
pub mod correlate;
mod dashboard;
mod detail;
mod error;
pub mod normalize;
mod search;
mod source;
mod summary;
pub mod units;

#[cfg(test)]
mod fake;

pub use client::KubeClient;
pub use dashboard::Dashboard;
pub use error::FetchError;
pub use source::{ResourceSource, UsageTarget};

// Re-export types that are used in our public API
pub use kubedash_types::{
    ClusterIdentity, ClusterSummary, ErrorRecord, HealthStatus, Kind, NormalizedRecord,
    ResourceDetail, UsageRecord, VolumeBinding,
};
