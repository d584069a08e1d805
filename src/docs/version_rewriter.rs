//! Version Rewriter - Updates version references in documentation
//!
//! Six replacements run in order, each over the output of the previous one:
//!
//! 1. `<version>X.Y.Z</version>` becomes the release version
//! 2. `<version>X.Y.Z-SNAPSHOT</version>` becomes the next snapshot
//! 3. `implementation ... <group>:<artifact>:X.Y.Z` becomes the release version
//! 4. `implementation ... <group>:<artifact>:X.Y.Z-SNAPSHOT` becomes the next snapshot
//! 5. `<!--VERSION_STABLE-->...<!--/VERSION_STABLE-->` wraps the release version
//! 6. `<!--VERSION_UNSTABLE-->...<!--/VERSION_UNSTABLE-->` wraps `<version>-alpha`
//!
//! The next snapshot is `<major>.<minor + 1>.0-SNAPSHOT`, taken from the
//! release version rather than from the matched text. Patterns never span
//! lines.
//!
//! # Example
//!
//! ```
//! use release_prep::docs::rewrite;
//!
//! let text = "<version>1.29.0</version>\n<version>1.29.0-SNAPSHOT</version>\n";
//! let updated = rewrite("1.30.0", text).unwrap();
//!
//! assert_eq!(updated, "<version>1.30.0</version>\n<version>1.31.0-SNAPSHOT</version>\n");
//! ```

use super::release_version::ReleaseVersion;
use crate::core::config::DocsConfig;
use crate::core::error::ReleaseError;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::Serialize;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

const STABLE_OPEN: &str = "<!--VERSION_STABLE-->";
const STABLE_CLOSE: &str = "<!--/VERSION_STABLE-->";
const UNSTABLE_OPEN: &str = "<!--VERSION_UNSTABLE-->";
const UNSTABLE_CLOSE: &str = "<!--/VERSION_UNSTABLE-->";

lazy_static! {
    static ref STABLE_TAG: Regex =
        Regex::new(r"<version>[0-9]+\.[0-9]+\.[0-9]+</version>").expect("static pattern");
    static ref SNAPSHOT_TAG: Regex =
        Regex::new(r"<version>[0-9]+\.[0-9]+\.[0-9]+-SNAPSHOT</version>").expect("static pattern");
    static ref STABLE_MARKER: Regex =
        Regex::new(r"<!--VERSION_STABLE-->.*<!--/VERSION_STABLE-->").expect("static pattern");
    static ref UNSTABLE_MARKER: Regex =
        Regex::new(r"<!--VERSION_UNSTABLE-->.*<!--/VERSION_UNSTABLE-->").expect("static pattern");
    static ref DEPENDENCY_LINE: Regex = Regex::new(r"implementation.*").expect("static pattern");
    static ref COORDINATE_VERSION: Regex =
        Regex::new(r":([0-9]+\.[0-9]+\.[0-9]+)").expect("static pattern");
}

/// What the rewriter matches besides the fixed tags and markers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRules {
    /// Maven group of the `implementation` coordinates to update
    pub coordinate_group: String,
}

impl Default for RewriteRules {
    fn default() -> Self {
        Self::from_config(&DocsConfig::default())
    }
}

impl RewriteRules {
    pub fn from_config(config: &DocsConfig) -> Self {
        Self {
            coordinate_group: config.coordinate_group.clone(),
        }
    }
}

/// Replacement counts per step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RewriteSummary {
    pub stable_tags: usize,
    pub snapshot_tags: usize,
    pub stable_coordinates: usize,
    pub snapshot_coordinates: usize,
    pub stable_markers: usize,
    pub unstable_markers: usize,
}

impl RewriteSummary {
    pub fn total(&self) -> usize {
        self.stable_tags
            + self.snapshot_tags
            + self.stable_coordinates
            + self.snapshot_coordinates
            + self.stable_markers
            + self.unstable_markers
    }
}

/// Result of rewriting a documentation file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// The file does not exist; nothing was done
    Missing,
    /// Rewriting produced the same text; the file was left alone
    Unchanged { summary: RewriteSummary },
    /// Rewriting changed the text; `written` is false for a dry run
    Updated {
        summary: RewriteSummary,
        written: bool,
    },
}

/// Compiled rewriter
#[derive(Debug, Clone)]
pub struct VersionRewriter {
    /// `<group>:`, the start of a coordinate of interest
    group_anchor: String,
    snapshot_coordinate: Regex,
}

impl Default for VersionRewriter {
    fn default() -> Self {
        Self::build(RewriteRules::default())
    }
}

impl VersionRewriter {
    /// Create a rewriter for the given rules
    pub fn new(rules: RewriteRules) -> Result<Self, ReleaseError> {
        if rules.coordinate_group.trim().is_empty() {
            return Err(ReleaseError::InvalidPattern {
                pattern: rules.coordinate_group,
                message: "coordinate group is empty".to_string(),
            });
        }
        Ok(Self::build(rules))
    }

    fn build(rules: RewriteRules) -> Self {
        // The group is escaped, so the pattern is always valid.
        let snapshot_coordinate = Regex::new(&format!(
            r"(implementation.*{}:.*:)([0-9]+\.[0-9]+\.[0-9]+-SNAPSHOT)(.*)",
            regex::escape(&rules.coordinate_group)
        ))
        .expect("escaped coordinate pattern");

        Self {
            group_anchor: format!("{}:", rules.coordinate_group),
            snapshot_coordinate,
        }
    }

    /// Rewrite the last stable coordinate of a dependency line
    ///
    /// `line` runs from the first `implementation` to the end of the line.
    /// Candidates are `:X.Y.Z` after the first `<group>:`, with the patch
    /// number complete and not followed by `-SNAPSHOT`.
    fn rewrite_stable_coordinate(&self, line: &str, release: &str) -> Option<String> {
        let search_from = line.find(&self.group_anchor)? + self.group_anchor.len();

        let version = COORDINATE_VERSION
            .captures_iter(&line[search_from..])
            .filter_map(|caps| caps.get(1))
            .filter(|m| !line[search_from + m.end()..].starts_with("-SNAPSHOT"))
            .last()?;

        let start = search_from + version.start();
        let end = search_from + version.end();
        Some(format!("{}{}{}", &line[..start], release, &line[end..]))
    }

    /// Rewrite `text` for the release `version`
    pub fn rewrite(&self, version: &str, text: &str) -> Result<String, ReleaseError> {
        let version = ReleaseVersion::parse(version)?;
        Ok(self.rewrite_version(&version, text).0)
    }

    /// Rewrite `text` for an already parsed version, counting replacements
    pub fn rewrite_version(&self, version: &ReleaseVersion, text: &str) -> (String, RewriteSummary) {
        let mut summary = RewriteSummary::default();
        let release = version.as_str();
        let snapshot = version.next_snapshot();

        let stable_tag = format!("<version>{}</version>", release);
        let text = replace_counted(&STABLE_TAG, text, &mut summary.stable_tags, |_| {
            stable_tag.clone()
        });

        let snapshot_tag = format!("<version>{}</version>", snapshot);
        let text = replace_counted(&SNAPSHOT_TAG, &text, &mut summary.snapshot_tags, |_| {
            snapshot_tag.clone()
        });

        let text = DEPENDENCY_LINE
            .replace_all(&text, |caps: &Captures<'_>| {
                match self.rewrite_stable_coordinate(&caps[0], release) {
                    Some(line) => {
                        summary.stable_coordinates += 1;
                        line
                    }
                    None => caps[0].to_string(),
                }
            })
            .into_owned();

        let text = replace_counted(
            &self.snapshot_coordinate,
            &text,
            &mut summary.snapshot_coordinates,
            |caps| format!("{}{}{}", &caps[1], snapshot, &caps[3]),
        );

        let stable_marker = format!("{}{}{}", STABLE_OPEN, release, STABLE_CLOSE);
        let text = replace_counted(&STABLE_MARKER, &text, &mut summary.stable_markers, |_| {
            stable_marker.clone()
        });

        let unstable_marker = format!("{}{}{}", UNSTABLE_OPEN, version.alpha(), UNSTABLE_CLOSE);
        let text = replace_counted(&UNSTABLE_MARKER, &text, &mut summary.unstable_markers, |_| {
            unstable_marker.clone()
        });

        debug!(version = release, replacements = summary.total(), "Rewrote document text");
        (text, summary)
    }

    /// Rewrite a documentation file in place
    ///
    /// The version is parsed before the file is read, so a malformed
    /// version never leaves a partially written file. A missing file is not
    /// an error.
    pub async fn rewrite_file(
        &self,
        version: &str,
        path: &Path,
    ) -> Result<RewriteOutcome, ReleaseError> {
        self.process_file(version, path, false).await
    }

    /// Same as [`rewrite_file`](Self::rewrite_file) without writing
    pub async fn preview_file(
        &self,
        version: &str,
        path: &Path,
    ) -> Result<RewriteOutcome, ReleaseError> {
        self.process_file(version, path, true).await
    }

    async fn process_file(
        &self,
        version: &str,
        path: &Path,
        dry_run: bool,
    ) -> Result<RewriteOutcome, ReleaseError> {
        let version = ReleaseVersion::parse(version)?;

        let exists = fs::try_exists(path)
            .await
            .map_err(|e| ReleaseError::DocumentRead {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        if !exists {
            info!(path = %path.display(), "Documentation file not found, skipping");
            return Ok(RewriteOutcome::Missing);
        }

        let original = fs::read_to_string(path)
            .await
            .map_err(|e| ReleaseError::DocumentRead {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let (updated, summary) = self.rewrite_version(&version, &original);
        if updated == original {
            return Ok(RewriteOutcome::Unchanged { summary });
        }

        if !dry_run {
            fs::write(path, updated)
                .await
                .map_err(|e| ReleaseError::DocumentWrite {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
            info!(path = %path.display(), version = %version, "Documentation updated");
        }

        Ok(RewriteOutcome::Updated {
            summary,
            written: !dry_run,
        })
    }
}

/// Replace every match, adding the number of matches to `count`
fn replace_counted<F>(pattern: &Regex, text: &str, count: &mut usize, mut replacement: F) -> String
where
    F: FnMut(&Captures<'_>) -> String,
{
    pattern
        .replace_all(text, |caps: &Captures<'_>| {
            *count += 1;
            replacement(caps)
        })
        .into_owned()
}

/// Rewrite `text` for the release `version` with the default rules
pub fn rewrite(version: &str, text: &str) -> Result<String, ReleaseError> {
    VersionRewriter::default().rewrite(version, text)
}

/// Rewrite the file at `path` for the release `version` with the default rules
pub async fn rewrite_file(version: &str, path: &Path) -> Result<RewriteOutcome, ReleaseError> {
    VersionRewriter::default().rewrite_file(version, path).await
}
