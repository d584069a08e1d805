//! Error handling for release preparation
//!
//! This module provides the error type shared by the task gate, the
//! documentation rewriter and the configuration loader, with recovery
//! guidance in the same shape for every variant.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for release preparation operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    // Version errors
    #[error("Malformed release version '{version}': {reason}")]
    MalformedVersion { version: String, reason: String },

    // Document errors
    #[error("Failed to read {path}: {message}")]
    DocumentRead { path: PathBuf, message: String },

    #[error("Failed to write {path}: {message}")]
    DocumentWrite { path: PathBuf, message: String },

    // Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl ReleaseError {
    /// Shorthand for a malformed version error
    pub fn malformed_version(version: &str, reason: impl Into<String>) -> Self {
        Self::MalformedVersion {
            version: version.to_string(),
            reason: reason.into(),
        }
    }

    /// Check if this error is recoverable
    ///
    /// Version and pattern errors need a different input; I/O and config
    /// errors can go away once the environment is fixed.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::MalformedVersion { .. } | Self::InvalidPattern { .. }
        )
    }

    /// Get suggested actions for this error
    pub fn suggested_actions(&self) -> Vec<&'static str> {
        match self {
            Self::MalformedVersion { .. } => vec![
                "Pass the release version as MAJOR.MINOR[.PATCH] (e.g. 1.30.0)",
                "Check the RELEASE_VERSION environment variable",
            ],
            Self::DocumentRead { .. } => vec![
                "Check that the file is readable",
                "Check that the file is valid UTF-8",
            ],
            Self::DocumentWrite { .. } => vec![
                "Check file permissions",
                "Check that the disk is not full",
            ],
            Self::ConfigError(_) => vec![
                "Check .release-prep.yaml for syntax errors",
                "Run `release-prep show-config` to inspect the resolved configuration",
            ],
            Self::InvalidPattern { .. } => {
                vec!["Task patterns must be non-empty substrings"]
            }
        }
    }

    /// Get error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedVersion { .. } => "MALFORMED_VERSION",
            Self::DocumentRead { .. } => "DOCUMENT_READ",
            Self::DocumentWrite { .. } => "DOCUMENT_WRITE",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidPattern { .. } => "INVALID_PATTERN",
        }
    }
}
