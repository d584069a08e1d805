//! Version Validator - Validates semantic versioning (semver)
//!
//! The doc rewriter only needs a numeric major and minor; this validator is
//! the stricter Semantic Versioning 2.0.0 check used to warn about release
//! versions that downstream tooling may reject.
//!
//! # Example
//!
//! ```
//! use release_prep::validation::version_validator::VersionValidator;
//!
//! let validator = VersionValidator::new();
//! let result = validator.validate("1.30.0");
//!
//! assert!(result.is_valid);
//! assert_eq!(result.major, Some(1));
//! assert_eq!(result.minor, Some(30));
//! assert_eq!(result.patch, Some(0));
//! ```

use semver::Version;
use serde::{Deserialize, Serialize};

/// Result of version validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionValidationResult {
    /// Whether the version is valid semver
    pub is_valid: bool,
    /// Validation error message (if any)
    pub error: Option<String>,
    pub major: Option<u64>,
    pub minor: Option<u64>,
    pub patch: Option<u64>,
    /// Pre-release version (e.g., "SNAPSHOT")
    pub prerelease: Option<String>,
    /// Build metadata
    pub build: Option<String>,
}

/// Validator for semantic versioning
#[derive(Debug, Default)]
pub struct VersionValidator;

impl VersionValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a version string
    ///
    /// # Examples
    ///
    /// ```
    /// use release_prep::validation::VersionValidator;
    ///
    /// let validator = VersionValidator::new();
    ///
    /// assert!(validator.validate("1.30.0").is_valid);
    /// assert!(!validator.validate("1.30").is_valid);
    /// ```
    pub fn validate(&self, version_str: &str) -> VersionValidationResult {
        match Version::parse(version_str) {
            Ok(version) => VersionValidationResult {
                is_valid: true,
                error: None,
                major: Some(version.major),
                minor: Some(version.minor),
                patch: Some(version.patch),
                prerelease: (!version.pre.is_empty()).then(|| version.pre.to_string()),
                build: (!version.build.is_empty()).then(|| version.build.to_string()),
            },
            Err(e) => VersionValidationResult {
                is_valid: false,
                error: Some(e.to_string()),
                major: None,
                minor: None,
                patch: None,
                prerelease: None,
                build: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_release_version() {
        let validator = VersionValidator::new();
        let result = validator.validate("1.30.0");

        assert!(result.is_valid);
        assert_eq!(result.major, Some(1));
        assert_eq!(result.minor, Some(30));
        assert_eq!(result.patch, Some(0));
        assert!(result.prerelease.is_none());
        assert!(result.build.is_none());
    }

    #[test]
    fn test_validate_snapshot_version() {
        let validator = VersionValidator::new();
        let result = validator.validate("1.31.0-SNAPSHOT");

        assert!(result.is_valid);
        assert_eq!(result.prerelease, Some("SNAPSHOT".to_string()));
    }

    #[test]
    fn test_validate_version_with_build() {
        let validator = VersionValidator::new();
        let result = validator.validate("1.0.0+20230901");

        assert!(result.is_valid);
        assert_eq!(result.build, Some("20230901".to_string()));
    }

    #[test]
    fn test_major_minor_only_is_not_semver() {
        let validator = VersionValidator::new();
        let result = validator.validate("1.30");

        assert!(!result.is_valid);
        assert!(result.error.is_some());
        assert!(result.major.is_none());
    }
}
