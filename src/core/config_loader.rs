//! Configuration file loader for release-prep
//!
//! This module provides configuration loading, validation, and merging capabilities.

use super::config::*;
use crate::core::error::ReleaseError;
use crate::gate::GateRules;
use crate::publishing::NexusConfig;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Configuration file name
pub const CONFIG_FILENAME: &str = ".release-prep.yaml";

/// Environment variable carrying the release version
pub const RELEASE_VERSION_ENV: &str = "RELEASE_VERSION";

/// Environment variable pattern (${VAR_NAME})
const ENV_VAR_PATTERN: &str = r"\$\{([A-Z_][A-Z0-9_]*)\}";

lazy_static! {
    static ref ENV_VAR_REGEX: Regex = Regex::new(ENV_VAR_PATTERN).expect("static env pattern");
}

/// Configuration load options
#[derive(Debug, Clone, Default)]
pub struct ConfigLoadOptions {
    /// Project path to load config from
    pub project_path: PathBuf,

    /// Release version given on the command line (highest priority)
    pub release_version: Option<String>,

    /// Documentation file given on the command line
    pub readme: Option<PathBuf>,

    /// Environment variables
    pub env: HashMap<String, String>,
}

/// Configuration validation result
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationResult {
    /// Is configuration valid?
    pub valid: bool,

    /// Validation errors
    pub errors: Vec<ConfigValidationError>,

    /// Validation warnings
    pub warnings: Vec<ConfigValidationWarning>,
}

impl ConfigValidationResult {
    /// Fold another result into this one
    pub fn merge(&mut self, other: ConfigValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.valid = self.errors.is_empty();
    }
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Field path (e.g., "nexus.nexusUrl")
    pub field: String,

    /// Error message
    pub message: String,

    /// Expected type/value
    pub expected: Option<String>,

    /// Actual type/value
    pub actual: Option<String>,
}

/// Configuration validation warning
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationWarning {
    /// Field path
    pub field: String,

    /// Warning message
    pub message: String,

    /// Suggestion
    pub suggestion: Option<String>,
}

/// Configuration file loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from multiple sources with priority
    ///
    /// Priority (high to low):
    /// 1. CLI arguments
    /// 2. Environment variables
    /// 3. Project config (./.release-prep.yaml)
    /// 4. Default values
    pub async fn load(options: ConfigLoadOptions) -> Result<ReleaseConfig, ReleaseError> {
        // 3./4. Project config over defaults
        let mut config = Self::load_project_config(&options.project_path)
            .await?
            .unwrap_or_default();

        // 2. Environment variables
        if let Some(version) = options
            .env
            .get(RELEASE_VERSION_ENV)
            .filter(|v| !v.trim().is_empty())
        {
            config.release_version = Some(version.clone());
        }

        // 1. CLI arguments
        if let Some(version) = options.release_version {
            config.release_version = Some(version);
        }
        if let Some(readme) = options.readme {
            config.docs.readme = readme;
        }

        config.nexus = Self::expand_env_vars(config.nexus, &options.env);

        Ok(config)
    }

    /// Load project configuration from ./.release-prep.yaml
    async fn load_project_config(
        project_path: &Path,
    ) -> Result<Option<ReleaseConfig>, ReleaseError> {
        let config_path = project_path.join(CONFIG_FILENAME);

        if !config_path.exists() {
            debug!(path = %config_path.display(), "No project configuration, using defaults");
            return Ok(None);
        }

        let content = fs::read_to_string(&config_path).await.map_err(|e| {
            ReleaseError::ConfigError(format!("Failed to read config file: {}", e))
        })?;

        let config = Self::parse(&content)?;
        debug!(path = %config_path.display(), "Loaded project configuration");
        Ok(Some(config))
    }

    /// Parse configuration from YAML text
    pub fn parse(content: &str) -> Result<ReleaseConfig, ReleaseError> {
        // An empty file deserializes as null
        if content.trim().is_empty() {
            return Ok(ReleaseConfig::default());
        }

        serde_yaml::from_str(content).map_err(|e| {
            ReleaseError::ConfigError(format!("Failed to parse YAML config: {}", e))
        })
    }

    /// Expand environment variables in the publishing section
    fn expand_env_vars(mut nexus: NexusConfig, env: &HashMap<String, String>) -> NexusConfig {
        for value in [
            &mut nexus.package_group,
            &mut nexus.repository_name,
            &mut nexus.nexus_url,
            &mut nexus.snapshot_repository_url,
        ] {
            *value = Self::expand_string(value, env);
        }
        nexus
    }

    /// Expand environment variables in a single string
    ///
    /// Unknown variables are left in place.
    pub fn expand_string(input: &str, env: &HashMap<String, String>) -> String {
        ENV_VAR_REGEX
            .replace_all(input, |caps: &regex::Captures| {
                let var_name = &caps[1];
                match env.get(var_name) {
                    Some(value) => value.clone(),
                    None => {
                        warn!(variable = var_name, "Environment variable not found");
                        caps[0].to_string()
                    }
                }
            })
            .into_owned()
    }

    /// Validate configuration
    pub fn validate(config: &ReleaseConfig) -> ConfigValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        // 1. Check version (required)
        if config.version.is_empty() {
            errors.push(ConfigValidationError {
                field: "version".to_string(),
                message: "Version is required".to_string(),
                expected: Some(format!("string (e.g., \"{}\")", CONFIG_SCHEMA_VERSION)),
                actual: Some("empty".to_string()),
            });
        } else if config.version != CONFIG_SCHEMA_VERSION {
            warnings.push(ConfigValidationWarning {
                field: "version".to_string(),
                message: format!("Unknown version: {}", config.version),
                suggestion: Some(format!(
                    "Currently supported version is \"{}\" only",
                    CONFIG_SCHEMA_VERSION
                )),
            });
        }

        // 2. Validate gate patterns
        Self::validate_gate(&config.gate, &mut errors, &mut warnings);

        // 3. Validate docs settings
        Self::validate_docs(&config.docs, &mut errors, &mut warnings);

        let mut result = ConfigValidationResult {
            valid: errors.is_empty(),
            errors,
            warnings,
        };

        // 4. Validate publishing target
        result.merge(config.nexus.validate());

        result
    }

    fn validate_gate(
        gate: &GateConfig,
        errors: &mut Vec<ConfigValidationError>,
        warnings: &mut Vec<ConfigValidationWarning>,
    ) {
        if let Err(e) = GateRules::from_config(gate) {
            errors.push(ConfigValidationError {
                field: "gate".to_string(),
                message: e.to_string(),
                expected: Some("non-empty substrings".to_string()),
                actual: None,
            });
        }

        if gate.ignore_case.is_empty() && gate.case_sensitive.is_empty() {
            warnings.push(ConfigValidationWarning {
                field: "gate".to_string(),
                message: "No patterns configured, every task will run".to_string(),
                suggestion: Some("Remove the gate section to use the defaults".to_string()),
            });
        }
    }

    fn validate_docs(
        docs: &DocsConfig,
        errors: &mut Vec<ConfigValidationError>,
        _warnings: &mut Vec<ConfigValidationWarning>,
    ) {
        if docs.readme.as_os_str().is_empty() {
            errors.push(ConfigValidationError {
                field: "docs.readme".to_string(),
                message: "readme path is required".to_string(),
                expected: Some("file path".to_string()),
                actual: Some("empty".to_string()),
            });
        }

        if docs.coordinate_group.trim().is_empty() {
            errors.push(ConfigValidationError {
                field: "docs.coordinateGroup".to_string(),
                message: "coordinate group is required".to_string(),
                expected: Some("Maven group id (e.g., \"io.opentelemetry\")".to_string()),
                actual: Some("empty".to_string()),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_load_without_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ConfigLoader::load(ConfigLoadOptions {
            project_path: dir.path().to_path_buf(),
            ..Default::default()
        })
        .await
        .unwrap();

        assert_eq!(config, ReleaseConfig::default());
    }

    #[tokio::test]
    async fn test_load_project_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILENAME),
            "releaseVersion: \"1.29.0\"\ndocs:\n  readme: docs/README.md\n",
        )
        .unwrap();

        let config = ConfigLoader::load(ConfigLoadOptions {
            project_path: dir.path().to_path_buf(),
            ..Default::default()
        })
        .await
        .unwrap();

        assert_eq!(config.release_version.as_deref(), Some("1.29.0"));
        assert_eq!(config.docs.readme, PathBuf::from("docs/README.md"));
    }

    #[tokio::test]
    async fn test_priority_cli_over_env_over_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "releaseVersion: \"1.0.0\"\n").unwrap();

        let from_env = ConfigLoader::load(ConfigLoadOptions {
            project_path: dir.path().to_path_buf(),
            env: env(&[(RELEASE_VERSION_ENV, "1.1.0")]),
            ..Default::default()
        })
        .await
        .unwrap();
        assert_eq!(from_env.release_version.as_deref(), Some("1.1.0"));

        let from_cli = ConfigLoader::load(ConfigLoadOptions {
            project_path: dir.path().to_path_buf(),
            release_version: Some("1.2.0".to_string()),
            readme: Some(PathBuf::from("CHANGELOG.md")),
            env: env(&[(RELEASE_VERSION_ENV, "1.1.0")]),
        })
        .await
        .unwrap();
        assert_eq!(from_cli.release_version.as_deref(), Some("1.2.0"));
        assert_eq!(from_cli.docs.readme, PathBuf::from("CHANGELOG.md"));
    }

    #[tokio::test]
    async fn test_load_invalid_yaml() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "gate: [unclosed").unwrap();

        let err = ConfigLoader::load(ConfigLoadOptions {
            project_path: dir.path().to_path_buf(),
            ..Default::default()
        })
        .await
        .unwrap_err();

        assert_eq!(err.code(), "CONFIG_ERROR");
    }

    #[tokio::test]
    async fn test_nexus_urls_expand_env_vars() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILENAME),
            "nexus:\n  nexusUrl: \"https://${NEXUS_HOST}/releases/\"\n  snapshotRepositoryUrl: \"https://${MISSING_HOST}/snapshots/\"\n",
        )
        .unwrap();

        let config = ConfigLoader::load(ConfigLoadOptions {
            project_path: dir.path().to_path_buf(),
            env: env(&[("NEXUS_HOST", "nexus.example.com")]),
            ..Default::default()
        })
        .await
        .unwrap();

        assert_eq!(config.nexus.nexus_url, "https://nexus.example.com/releases/");
        assert_eq!(
            config.nexus.snapshot_repository_url,
            "https://${MISSING_HOST}/snapshots/"
        );
    }

    #[test]
    fn test_parse_empty_file() {
        assert_eq!(ConfigLoader::parse("  \n").unwrap(), ReleaseConfig::default());
    }

    #[test]
    fn test_validate_default_config() {
        let result = ConfigLoader::validate(&ReleaseConfig::default());

        assert!(result.valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_validate_unknown_schema_version() {
        let config = ReleaseConfig {
            version: "2.0".to_string(),
            ..ReleaseConfig::default()
        };
        let result = ConfigLoader::validate(&config);

        assert!(result.valid);
        assert!(result.warnings.iter().any(|w| w.field == "version"));
    }

    #[test]
    fn test_validate_empty_gate_pattern() {
        let mut config = ReleaseConfig::default();
        config.gate.case_sensitive.push(String::new());
        let result = ConfigLoader::validate(&config);

        assert!(!result.valid);
        assert_eq!(result.errors[0].field, "gate");
    }

    #[test]
    fn test_validate_docs_section() {
        let mut config = ReleaseConfig::default();
        config.docs.coordinate_group = " ".to_string();
        config.docs.readme = PathBuf::new();
        let result = ConfigLoader::validate(&config);

        let fields: Vec<&str> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["docs.readme", "docs.coordinateGroup"]);
    }

    #[test]
    fn test_validate_merges_nexus_errors() {
        let mut config = ReleaseConfig::default();
        config.nexus.allow_insecure_protocol = false;
        let result = ConfigLoader::validate(&config);

        assert!(!result.valid);
        assert!(result.errors.iter().all(|e| e.field.starts_with("nexus.")));
    }
}
