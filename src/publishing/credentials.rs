//! Nexus credentials with memory-safe handling and masking
//!
//! Credentials are read from the environment variables named in
//! [`NexusConfig`] and held as [`SecretString`] so they never end up in
//! `Debug` output or logs.

use super::nexus::NexusConfig;
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::env;

/// Username and password for the Nexus repository
#[derive(Debug, Default)]
pub struct NexusCredentials {
    username: Option<SecretString>,
    password: Option<SecretString>,
}

impl NexusCredentials {
    /// Read credentials from the process environment
    pub fn from_env(config: &NexusConfig) -> Self {
        let vars: HashMap<String, String> = [&config.username_env, &config.password_env]
            .into_iter()
            .filter_map(|name| env::var(name).ok().map(|value| (name.clone(), value)))
            .collect();
        Self::from_vars(config, &vars)
    }

    /// Read credentials from an explicit variable map
    ///
    /// Empty values count as unset.
    pub fn from_vars(config: &NexusConfig, vars: &HashMap<String, String>) -> Self {
        let lookup = |name: &str| {
            vars.get(name)
                .filter(|value| !value.is_empty())
                .map(|value| SecretString::new(value.clone().into()))
        };

        Self {
            username: lookup(&config.username_env),
            password: lookup(&config.password_env),
        }
    }

    pub fn username(&self) -> Option<&SecretString> {
        self.username.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }

    /// Names of the variables that are not set
    pub fn missing_variables<'a>(&self, config: &'a NexusConfig) -> Vec<&'a str> {
        let mut missing = Vec::new();
        if self.username.is_none() {
            missing.push(config.username_env.as_str());
        }
        if self.password.is_none() {
            missing.push(config.password_env.as_str());
        }
        missing
    }

    /// Masked username for display; the password is never shown
    pub fn masked_username(&self) -> Option<String> {
        self.username
            .as_ref()
            .map(|u| mask_secret(u.expose_secret()))
    }
}

/// Masks a secret for safe logging
///
/// Shows only the first 3 and last 3 characters. Values shorter than 10
/// characters are fully masked as "****".
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() < 10 {
        return "****".to_string();
    }

    let prefix: String = chars[..3].iter().collect();
    let suffix: String = chars[chars.len() - 3..].iter().collect();
    format!("{}...{}", prefix, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_complete_credentials() {
        let config = NexusConfig::default();
        let creds = NexusCredentials::from_vars(
            &config,
            &vars(&[("NEXUS_USERNAME", "deployer"), ("NEXUS_PASSWORD", "s3cret")]),
        );

        assert!(creds.is_complete());
        assert!(creds.missing_variables(&config).is_empty());
        assert_eq!(creds.username().unwrap().expose_secret(), "deployer");
    }

    #[test]
    fn test_missing_and_empty_variables() {
        let config = NexusConfig::default();
        let creds = NexusCredentials::from_vars(&config, &vars(&[("NEXUS_USERNAME", "")]));

        assert!(!creds.is_complete());
        assert_eq!(
            creds.missing_variables(&config),
            vec!["NEXUS_USERNAME", "NEXUS_PASSWORD"]
        );
    }

    #[test]
    fn test_custom_variable_names() {
        let config = NexusConfig {
            username_env: "DEPLOY_USER".to_string(),
            password_env: "DEPLOY_PASS".to_string(),
            ..NexusConfig::default()
        };
        let creds = NexusCredentials::from_vars(
            &config,
            &vars(&[("DEPLOY_USER", "ci"), ("NEXUS_PASSWORD", "ignored")]),
        );

        assert!(creds.username().is_some());
        assert_eq!(creds.missing_variables(&config), vec!["DEPLOY_PASS"]);
    }

    #[test]
    fn test_debug_does_not_leak_password() {
        let config = NexusConfig::default();
        let creds = NexusCredentials::from_vars(
            &config,
            &vars(&[("NEXUS_USERNAME", "deployer"), ("NEXUS_PASSWORD", "hunter2hunter2")]),
        );

        assert!(!format!("{:?}", creds).contains("hunter2"));
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("abcdef123456"), "abc...456");
        assert_eq!(mask_secret("short"), "****");
        assert_eq!(mask_secret(""), "****");
    }

    #[test]
    fn test_masked_username() {
        let config = NexusConfig::default();
        let creds = NexusCredentials::from_vars(
            &config,
            &vars(&[("NEXUS_USERNAME", "release-automation")]),
        );

        assert_eq!(creds.masked_username().as_deref(), Some("rel...ion"));
    }
}
