use kubedash_types::Kind;

/// Failure of a single read against the cluster
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Kubernetes API request failed: {0}")]
    Api(#[from] kube::Error),

    #[error("detail lookups are not supported for {0}")]
    Unsupported(Kind),

    #[error("{0} is unavailable")]
    Unavailable(String),
}

impl FetchError {
    /// Whether the API answered "not found" (e.g. an aggregated API that is not installed)
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api(kube::Error::Api(response)) if response.code == 404)
    }
}
