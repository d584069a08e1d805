//! Configuration structures and types for release-prep
//!
//! This module provides type-safe configuration management with serde support.
//! Every section is optional in the file; missing values fall back to the
//! defaults of the project's root build script.

use crate::publishing::NexusConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Current configuration schema version
pub const CONFIG_SCHEMA_VERSION: &str = "1.0";

/// Root configuration object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseConfig {
    /// Schema version
    #[serde(default = "default_schema_version")]
    pub version: String,

    /// Release version to write into the docs (the `release.version` property)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_version: Option<String>,

    /// Task gate patterns
    #[serde(default)]
    pub gate: GateConfig,

    /// Documentation rewrite settings
    #[serde(default)]
    pub docs: DocsConfig,

    /// Nexus publishing target (carried, never contacted)
    #[serde(default)]
    pub nexus: NexusConfig,
}

fn default_schema_version() -> String {
    CONFIG_SCHEMA_VERSION.to_string()
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            version: default_schema_version(),
            release_version: None,
            gate: GateConfig::default(),
            docs: DocsConfig::default(),
            nexus: NexusConfig::default(),
        }
    }
}

/// Task gate patterns
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct GateConfig {
    /// Substrings matched against the task path ignoring ASCII case
    pub ignore_case: Vec<String>,

    /// Substrings matched against the task path exactly
    pub case_sensitive: Vec<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            ignore_case: [
                "japicmp",
                "test",
                "javadoc",
                "benchmark",
                "spotless",
                "sourcesjar",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            case_sensitive: vec!["checkstyle".to_string()],
        }
    }
}

/// Documentation rewrite settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct DocsConfig {
    /// Documentation file, relative to the project directory
    pub readme: PathBuf,

    /// Maven group whose `implementation` coordinates get rewritten
    pub coordinate_group: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            readme: PathBuf::from("README.md"),
            coordinate_group: "io.opentelemetry".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_gate_patterns() {
        let gate = GateConfig::default();

        assert_eq!(gate.ignore_case.len(), 6);
        assert!(gate.ignore_case.contains(&"sourcesjar".to_string()));
        assert_eq!(gate.case_sensitive, vec!["checkstyle".to_string()]);
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config: ReleaseConfig = serde_yaml::from_str("{}").unwrap();

        assert_eq!(config, ReleaseConfig::default());
        assert_eq!(config.docs.readme, PathBuf::from("README.md"));
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let yaml = r#"
version: "1.0"
releaseVersion: "1.30.0"
docs:
  coordinateGroup: com.example
"#;
        let config: ReleaseConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.release_version.as_deref(), Some("1.30.0"));
        assert_eq!(config.docs.coordinate_group, "com.example");
        assert_eq!(config.docs.readme, PathBuf::from("README.md"));
        assert_eq!(config.gate, GateConfig::default());
    }

    #[test]
    fn test_release_version_not_serialized_when_absent() {
        let yaml = serde_yaml::to_string(&ReleaseConfig::default()).unwrap();

        assert!(!yaml.contains("releaseVersion"));
        assert!(yaml.contains("coordinateGroup"));
    }
}
