//! Documentation version rewriting
//!
//! Keeps the version references in the project README in step with the
//! release being cut.

pub mod release_version;
pub mod version_rewriter;

pub use release_version::ReleaseVersion;
pub use version_rewriter::{
    RewriteOutcome, RewriteRules, RewriteSummary, VersionRewriter, rewrite, rewrite_file,
};
