//! Task Gate - Skips build tasks whose path matches a denylist
//!
//! Every task path is checked against two pattern sets: one matched ignoring
//! ASCII case, one matched exactly. A match disables the task. One line is
//! emitted per task, `skipping : <path>` or `excuting : <path>`; the
//! spelling of the second is what existing log scrapers look for.
//!
//! # Example
//!
//! ```
//! use release_prep::gate::{TaskDescriptor, TaskGate};
//!
//! let gate = TaskGate::default();
//! let mut tasks = vec![
//!     TaskDescriptor::new(":sdk:all:compileJava"),
//!     TaskDescriptor::new(":sdk:all:compileTestJava"),
//! ];
//!
//! let report = gate.apply(&mut tasks);
//!
//! assert!(tasks[0].enabled);
//! assert!(!tasks[1].enabled);
//! assert_eq!(report.skipped, 1);
//! ```

use crate::core::config::GateConfig;
use crate::core::error::ReleaseError;
use aho_corasick::AhoCorasick;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use tracing::debug;

const SKIP_PREFIX: &str = "skipping : ";
const RUN_PREFIX: &str = "excuting : ";

/// A scheduled build task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    /// Hierarchical task path, e.g. `:sdk:trace:javadoc`
    pub path: String,
    pub enabled: bool,
}

impl TaskDescriptor {
    /// Create an enabled task
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            enabled: true,
        }
    }
}

/// What the gate decided for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateAction {
    Run,
    Skip,
}

/// Decision for a single task path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateDecision {
    pub path: String,
    pub action: GateAction,
    /// Pattern that caused the skip
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<String>,
}

impl GateDecision {
    pub fn is_skipped(&self) -> bool {
        self.action == GateAction::Skip
    }

    /// The log line for this decision
    pub fn log_line(&self) -> String {
        match self.action {
            GateAction::Skip => format!("{}{}", SKIP_PREFIX, self.path),
            GateAction::Run => format!("{}{}", RUN_PREFIX, self.path),
        }
    }
}

/// Outcome of gating a whole task list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateReport {
    pub decisions: Vec<GateDecision>,
    pub executed: usize,
    pub skipped: usize,
    pub generated_at: DateTime<Utc>,
}

impl GateReport {
    fn from_decisions(decisions: Vec<GateDecision>) -> Self {
        let skipped = decisions.iter().filter(|d| d.is_skipped()).count();
        Self {
            executed: decisions.len() - skipped,
            skipped,
            decisions,
            generated_at: Utc::now(),
        }
    }

    /// Log lines in task order
    pub fn log_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.decisions.iter().map(GateDecision::log_line)
    }
}

/// Compiled skip patterns
#[derive(Debug, Clone)]
pub struct GateRules {
    ignore_case: Vec<String>,
    case_sensitive: Vec<String>,
    ignore_case_matcher: Option<AhoCorasick>,
    case_sensitive_matcher: Option<AhoCorasick>,
}

impl Default for GateRules {
    fn default() -> Self {
        // The default pattern set is non-empty and free of empty strings.
        Self::from_config(&GateConfig::default()).expect("default gate patterns compile")
    }
}

impl GateRules {
    /// Compile the two pattern sets
    ///
    /// # Errors
    ///
    /// Returns `ReleaseError::InvalidPattern` for an empty pattern, which
    /// would match every task.
    pub fn new(ignore_case: Vec<String>, case_sensitive: Vec<String>) -> Result<Self, ReleaseError> {
        let ignore_case_matcher = Self::build_matcher(&ignore_case, true)?;
        let case_sensitive_matcher = Self::build_matcher(&case_sensitive, false)?;

        Ok(Self {
            ignore_case,
            case_sensitive,
            ignore_case_matcher,
            case_sensitive_matcher,
        })
    }

    pub fn from_config(config: &GateConfig) -> Result<Self, ReleaseError> {
        Self::new(config.ignore_case.clone(), config.case_sensitive.clone())
    }

    fn build_matcher(
        patterns: &[String],
        ascii_case_insensitive: bool,
    ) -> Result<Option<AhoCorasick>, ReleaseError> {
        if patterns.is_empty() {
            return Ok(None);
        }

        if let Some(empty) = patterns.iter().find(|p| p.is_empty()) {
            return Err(ReleaseError::InvalidPattern {
                pattern: empty.clone(),
                message: "empty pattern matches every task".to_string(),
            });
        }

        AhoCorasick::builder()
            .ascii_case_insensitive(ascii_case_insensitive)
            .build(patterns)
            .map(Some)
            .map_err(|e| ReleaseError::InvalidPattern {
                pattern: patterns.join(","),
                message: e.to_string(),
            })
    }

    /// First pattern found in `path`, if any
    pub fn find(&self, path: &str) -> Option<&str> {
        find_in(&self.ignore_case_matcher, &self.ignore_case, path)
            .or_else(|| find_in(&self.case_sensitive_matcher, &self.case_sensitive, path))
    }
}

fn find_in<'a>(
    matcher: &Option<AhoCorasick>,
    patterns: &'a [String],
    haystack: &str,
) -> Option<&'a str> {
    matcher
        .as_ref()
        .and_then(|m| m.find(haystack))
        .map(|found| patterns[found.pattern().as_usize()].as_str())
}

/// Gate over a scheduled task list
#[derive(Debug, Clone, Default)]
pub struct TaskGate {
    rules: GateRules,
}

impl TaskGate {
    pub fn new(rules: GateRules) -> Self {
        Self { rules }
    }

    /// Decide for a single path without touching any task
    pub fn decide(&self, path: &str) -> GateDecision {
        match self.rules.find(path) {
            Some(pattern) => GateDecision {
                path: path.to_string(),
                action: GateAction::Skip,
                matched: Some(pattern.to_string()),
            },
            None => GateDecision {
                path: path.to_string(),
                action: GateAction::Run,
                matched: None,
            },
        }
    }

    /// Disable matching tasks, without emitting log lines
    ///
    /// Tasks that do not match are left as they are; an already disabled
    /// task stays disabled.
    pub fn apply(&self, tasks: &mut [TaskDescriptor]) -> GateReport {
        let decisions = tasks
            .iter_mut()
            .map(|task| {
                let decision = self.decide(&task.path);
                if decision.is_skipped() {
                    task.enabled = false;
                    debug!(path = %task.path, pattern = ?decision.matched, "Task disabled");
                }
                decision
            })
            .collect();

        GateReport::from_decisions(decisions)
    }

    /// Disable matching tasks and print one line per task to stdout
    pub fn filter(&self, tasks: &mut [TaskDescriptor]) -> GateReport {
        let report = self.apply(tasks);
        for line in report.log_lines() {
            println!("{}", line);
        }
        report
    }

    /// Disable matching tasks and write one line per task to `out`
    pub fn filter_to<W: Write>(
        &self,
        tasks: &mut [TaskDescriptor],
        out: &mut W,
    ) -> io::Result<GateReport> {
        let report = self.apply(tasks);
        for line in report.log_lines() {
            writeln!(out, "{}", line)?;
        }
        Ok(report)
    }
}
