//! Nexus repository settings
//!
//! Defaults mirror the root build script: a single non-staging hosted
//! repository reached over plain HTTP, with credentials taken from
//! `NEXUS_USERNAME` / `NEXUS_PASSWORD`.

use crate::core::config_loader::{
    ConfigValidationError, ConfigValidationResult, ConfigValidationWarning,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_REPOSITORY_URL: &str = "http://zmq:8081/repository/mvn-hosted/";

lazy_static! {
    static ref URL_PATTERN: Regex =
        Regex::new(r"^(?P<scheme>[a-zA-Z][a-zA-Z0-9+.-]*)://(?P<host>[^/\s?#]+)(?P<rest>\S*)$")
            .expect("static URL pattern");
}

/// Nexus publishing configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct NexusConfig {
    /// Group of the artifacts being published
    pub package_group: String,

    /// Repository name as registered with the publish plugin
    pub repository_name: String,

    /// Release repository URL
    pub nexus_url: String,

    /// Snapshot repository URL
    pub snapshot_repository_url: String,

    /// Environment variable holding the username
    pub username_env: String,

    /// Environment variable holding the password
    pub password_env: String,

    /// Close/release through a staging repository
    pub use_staging: bool,

    /// Allow `http://` repository URLs
    pub allow_insecure_protocol: bool,

    pub connect_timeout_secs: u64,

    pub client_timeout_secs: u64,

    /// Polling of staging repository transitions
    pub transition_check: TransitionCheckOptions,
}

impl Default for NexusConfig {
    fn default() -> Self {
        Self {
            package_group: "io.opentelemetry".to_string(),
            repository_name: "myNexus".to_string(),
            nexus_url: DEFAULT_REPOSITORY_URL.to_string(),
            snapshot_repository_url: DEFAULT_REPOSITORY_URL.to_string(),
            username_env: "NEXUS_USERNAME".to_string(),
            password_env: "NEXUS_PASSWORD".to_string(),
            use_staging: false,
            allow_insecure_protocol: true,
            connect_timeout_secs: 300,
            client_timeout_secs: 300,
            transition_check: TransitionCheckOptions::default(),
        }
    }
}

/// Polling options for repository state transitions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct TransitionCheckOptions {
    pub max_retries: u32,
    pub delay_between_secs: u64,
}

impl Default for TransitionCheckOptions {
    // 300 polls 10 seconds apart: 50 minutes for the repository to close.
    fn default() -> Self {
        Self {
            max_retries: 300,
            delay_between_secs: 10,
        }
    }
}

impl TransitionCheckOptions {
    pub fn delay_between(&self) -> Duration {
        Duration::from_secs(self.delay_between_secs)
    }

    /// Longest time the publish plugin waits for a transition
    pub fn total_wait(&self) -> Duration {
        self.delay_between().saturating_mul(self.max_retries)
    }
}

impl NexusConfig {
    /// Validate the publishing settings
    ///
    /// Credentials are not checked here, see [`NexusCredentials`](super::NexusCredentials).
    pub fn validate(&self) -> ConfigValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        for (field, url) in [
            ("nexus.nexusUrl", &self.nexus_url),
            ("nexus.snapshotRepositoryUrl", &self.snapshot_repository_url),
        ] {
            self.validate_url(field, url, &mut errors, &mut warnings);
        }

        for (field, name) in [
            ("nexus.usernameEnv", &self.username_env),
            ("nexus.passwordEnv", &self.password_env),
        ] {
            if name.trim().is_empty() {
                errors.push(ConfigValidationError {
                    field: field.to_string(),
                    message: "environment variable name is required".to_string(),
                    expected: Some("non-empty string".to_string()),
                    actual: Some("empty".to_string()),
                });
            }
        }

        for (field, secs) in [
            ("nexus.connectTimeoutSecs", self.connect_timeout_secs),
            ("nexus.clientTimeoutSecs", self.client_timeout_secs),
            (
                "nexus.transitionCheck.delayBetweenSecs",
                self.transition_check.delay_between_secs,
            ),
        ] {
            if secs == 0 {
                errors.push(ConfigValidationError {
                    field: field.to_string(),
                    message: "must be greater than zero".to_string(),
                    expected: Some("seconds > 0".to_string()),
                    actual: Some("0".to_string()),
                });
            }
        }

        if self.transition_check.max_retries == 0 {
            errors.push(ConfigValidationError {
                field: "nexus.transitionCheck.maxRetries".to_string(),
                message: "must be greater than zero".to_string(),
                expected: Some("integer > 0".to_string()),
                actual: Some("0".to_string()),
            });
        }

        if self.package_group.trim().is_empty() {
            warnings.push(ConfigValidationWarning {
                field: "nexus.packageGroup".to_string(),
                message: "package group is empty".to_string(),
                suggestion: Some("set it to the group of the published artifacts".to_string()),
            });
        }

        ConfigValidationResult {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    fn validate_url(
        &self,
        field: &str,
        url: &str,
        errors: &mut Vec<ConfigValidationError>,
        warnings: &mut Vec<ConfigValidationWarning>,
    ) {
        let Some(caps) = URL_PATTERN.captures(url.trim()) else {
            errors.push(ConfigValidationError {
                field: field.to_string(),
                message: "not a valid URL".to_string(),
                expected: Some("http(s)://host[:port]/path".to_string()),
                actual: Some(url.to_string()),
            });
            return;
        };

        match caps["scheme"].to_ascii_lowercase().as_str() {
            "https" => {}
            "http" if self.allow_insecure_protocol => warnings.push(ConfigValidationWarning {
                field: field.to_string(),
                message: "repository is reached over plain HTTP".to_string(),
                suggestion: Some("prefer an https:// URL".to_string()),
            }),
            "http" => errors.push(ConfigValidationError {
                field: field.to_string(),
                message: "plain HTTP requires allowInsecureProtocol".to_string(),
                expected: Some("https:// URL".to_string()),
                actual: Some(url.to_string()),
            }),
            other => errors.push(ConfigValidationError {
                field: field.to_string(),
                message: format!("unsupported scheme '{}'", other),
                expected: Some("http or https".to_string()),
                actual: Some(url.to_string()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_build_script() {
        let config = NexusConfig::default();

        assert_eq!(config.package_group, "io.opentelemetry");
        assert_eq!(config.repository_name, "myNexus");
        assert_eq!(config.nexus_url, config.snapshot_repository_url);
        assert!(!config.use_staging);
        assert!(config.allow_insecure_protocol);
        assert_eq!(config.connect_timeout_secs, 5 * 60);
        assert_eq!(config.client_timeout_secs, 5 * 60);
    }

    #[test]
    fn test_total_wait_is_fifty_minutes() {
        let options = TransitionCheckOptions::default();
        assert_eq!(options.total_wait(), Duration::from_secs(50 * 60));
    }

    #[test]
    fn test_default_config_is_valid_with_http_warning() {
        let result = NexusConfig::default().validate();

        assert!(result.valid);
        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings.iter().all(|w| w.message.contains("HTTP")));
    }

    #[test]
    fn test_http_without_insecure_flag_is_error() {
        let config = NexusConfig {
            allow_insecure_protocol: false,
            ..NexusConfig::default()
        };
        let result = config.validate();

        assert!(!result.valid);
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.errors[0].field, "nexus.nexusUrl");
    }

    #[test]
    fn test_https_has_no_warnings() {
        let config = NexusConfig {
            nexus_url: "https://nexus.example.com/repository/releases/".to_string(),
            snapshot_repository_url: "https://nexus.example.com/repository/snapshots/"
                .to_string(),
            allow_insecure_protocol: false,
            ..NexusConfig::default()
        };
        let result = config.validate();

        assert!(result.valid);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_invalid_url_and_scheme() {
        let config = NexusConfig {
            nexus_url: "not a url".to_string(),
            snapshot_repository_url: "ftp://nexus/repo".to_string(),
            ..NexusConfig::default()
        };
        let result = config.validate();

        assert!(!result.valid);
        assert!(result.errors[0].message.contains("not a valid URL"));
        assert!(result.errors[1].message.contains("ftp"));
    }

    #[test]
    fn test_zero_values_are_errors() {
        let config = NexusConfig {
            connect_timeout_secs: 0,
            username_env: String::new(),
            transition_check: TransitionCheckOptions {
                max_retries: 0,
                delay_between_secs: 10,
            },
            ..NexusConfig::default()
        };
        let result = config.validate();

        let fields: Vec<&str> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"nexus.usernameEnv"));
        assert!(fields.contains(&"nexus.connectTimeoutSecs"));
        assert!(fields.contains(&"nexus.transitionCheck.maxRetries"));
        assert_eq!(fields.len(), 3);
    }
}
