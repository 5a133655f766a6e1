//! Optional TOML settings file

use std::path::Path;

use anyhow::{Context, Result};
use kubedash_types::UNKNOWN_CLUSTER;
use serde::Deserialize;

pub const DEFAULT_TICK_RATE_MS: u64 = 250;

/// Values read from the settings file. Every field is optional and
/// command-line flags take precedence over all of them.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Display name of the cluster
    pub cluster_name: Option<String>,

    /// Kubeconfig context to connect with
    pub context: Option<String>,

    /// Initial namespace scope
    pub namespace: Option<String>,

    /// Terminal UI tick interval
    pub tick_rate_ms: Option<u64>,
}

impl Settings {
    /// Read settings from `path`; no path means all defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Invalid settings file {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Display name for the cluster: the flag (or its environment
    /// variable), then the settings file, then a fixed placeholder
    pub fn cluster_name(&self, flag: Option<String>) -> String {
        flag.filter(|name| !name.trim().is_empty())
            .or_else(|| self.cluster_name.clone())
            .unwrap_or_else(|| UNKNOWN_CLUSTER.to_string())
    }

    pub fn tick_rate_ms(&self, flag: Option<u64>) -> u64 {
        flag.or(self.tick_rate_ms).unwrap_or(DEFAULT_TICK_RATE_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_file() {
        let settings = Settings::parse(
            r#"
            cluster_name = "staging"
            context = "staging-admin"
            namespace = "web"
            tick_rate_ms = 500
            "#,
        )
        .unwrap();

        assert_eq!(settings.cluster_name.as_deref(), Some("staging"));
        assert_eq!(settings.context.as_deref(), Some("staging-admin"));
        assert_eq!(settings.namespace.as_deref(), Some("web"));
        assert_eq!(settings.tick_rate_ms, Some(500));
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Settings::parse("").unwrap(), Settings::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Settings::parse("clustr_name = \"typo\"").is_err());
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = Settings::load(Some(Path::new("/nonexistent/kubedash.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read settings file"));
    }

    #[test]
    fn test_no_path_is_default() {
        assert_eq!(Settings::load(None).unwrap(), Settings::default());
    }

    #[test]
    fn test_cluster_name_precedence() {
        let settings = Settings {
            cluster_name: Some("from-file".to_string()),
            ..Default::default()
        };

        assert_eq!(settings.cluster_name(Some("from-flag".to_string())), "from-flag");
        assert_eq!(settings.cluster_name(None), "from-file");
        assert_eq!(settings.cluster_name(Some("  ".to_string())), "from-file");
        assert_eq!(Settings::default().cluster_name(None), "Unknown Cluster");
    }

    #[test]
    fn test_tick_rate_precedence() {
        let settings = Settings {
            tick_rate_ms: Some(500),
            ..Default::default()
        };

        assert_eq!(settings.tick_rate_ms(Some(100)), 100);
        assert_eq!(settings.tick_rate_ms(None), 500);
        assert_eq!(Settings::default().tick_rate_ms(None), DEFAULT_TICK_RATE_MS);
    }
}
