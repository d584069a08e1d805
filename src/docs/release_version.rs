//! Release version as supplied by the build (`release.version`)

use crate::core::error::ReleaseError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A release version with at least a numeric major and minor component
///
/// The raw text is what gets written into documents; only major and minor
/// are interpreted, to compute the next development snapshot.
///
/// # Examples
///
/// ```
/// use release_prep::docs::ReleaseVersion;
///
/// let version: ReleaseVersion = "1.30.0".parse().unwrap();
/// assert_eq!(version.major(), 1);
/// assert_eq!(version.minor(), 30);
/// assert_eq!(version.next_snapshot(), "1.31.0-SNAPSHOT");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseVersion {
    raw: String,
    major: u64,
    minor: u64,
    next_snapshot: String,
}

impl ReleaseVersion {
    /// Parse a release version
    ///
    /// # Errors
    ///
    /// `ReleaseError::MalformedVersion` when there are fewer than two
    /// dot-separated components, when major or minor is not an integer, or
    /// when the minor component cannot be incremented.
    pub fn parse(raw: &str) -> Result<Self, ReleaseError> {
        let mut parts = raw.split('.');

        let major = Self::component(raw, parts.next(), "major")?;
        let minor = Self::component(raw, parts.next(), "minor")?;

        let next_minor = minor
            .checked_add(1)
            .ok_or_else(|| ReleaseError::malformed_version(raw, "minor component overflows"))?;

        Ok(Self {
            raw: raw.to_string(),
            major,
            minor,
            next_snapshot: format!("{}.{}.0-SNAPSHOT", major, next_minor),
        })
    }

    fn component(raw: &str, part: Option<&str>, name: &str) -> Result<u64, ReleaseError> {
        let part = part
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ReleaseError::malformed_version(raw, format!("missing {} component", name)))?;

        if !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ReleaseError::malformed_version(
                raw,
                format!("{} component '{}' is not an integer", name, part),
            ));
        }

        part.parse::<u64>()
            .map_err(|e| ReleaseError::malformed_version(raw, format!("{} component: {}", name, e)))
    }

    /// The version exactly as supplied
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    /// `<major>.<minor + 1>.0-SNAPSHOT`
    pub fn next_snapshot(&self) -> &str {
        &self.next_snapshot
    }

    /// The version carries a pre-release marker (e.g. `-SNAPSHOT`, `-rc.1`)
    pub fn is_prerelease(&self) -> bool {
        self.raw.contains('-')
    }

    /// Version used for the unstable artifacts
    pub fn alpha(&self) -> String {
        format!("{}-alpha", self.raw)
    }
}

impl FromStr for ReleaseVersion {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for ReleaseVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_release() {
        let version = ReleaseVersion::parse("1.30.0").unwrap();

        assert_eq!(version.as_str(), "1.30.0");
        assert_eq!(version.major(), 1);
        assert_eq!(version.minor(), 30);
        assert_eq!(version.next_snapshot(), "1.31.0-SNAPSHOT");
        assert_eq!(version.alpha(), "1.30.0-alpha");
        assert!(!version.is_prerelease());
    }

    #[test]
    fn test_parse_major_minor_only() {
        let version = ReleaseVersion::parse("2.9").unwrap();
        assert_eq!(version.next_snapshot(), "2.10.0-SNAPSHOT");
    }

    #[test]
    fn test_patch_and_suffix_are_not_interpreted() {
        let version = ReleaseVersion::parse("1.30.0-SNAPSHOT").unwrap();

        assert!(version.is_prerelease());
        assert_eq!(version.next_snapshot(), "1.31.0-SNAPSHOT");
        assert_eq!(version.to_string(), "1.30.0-SNAPSHOT");
    }

    #[test]
    fn test_missing_minor() {
        let err = ReleaseVersion::parse("1").unwrap_err();
        assert_eq!(err.code(), "MALFORMED_VERSION");
        assert!(err.to_string().contains("missing minor"));

        assert!(ReleaseVersion::parse("1.").is_err());
        assert!(ReleaseVersion::parse("").is_err());
    }

    #[test]
    fn test_non_integer_components() {
        let err = ReleaseVersion::parse("1.x.0").unwrap_err();
        assert!(err.to_string().contains("'x'"));

        assert!(ReleaseVersion::parse("v1.2.0").is_err());
        assert!(ReleaseVersion::parse("1.2-rc.1").is_err());
        assert!(ReleaseVersion::parse("1.+2.0").is_err());
    }

    #[test]
    fn test_minor_overflow() {
        let raw = format!("1.{}.0", u64::MAX);
        let err = ReleaseVersion::parse(&raw).unwrap_err();
        assert!(err.to_string().contains("overflows"));
    }

    #[test]
    fn test_from_str_and_serialize() {
        let version: ReleaseVersion = "1.29.0".parse().unwrap();
        assert_eq!(serde_json::to_string(&version).unwrap(), "\"1.29.0\"");
    }
}
