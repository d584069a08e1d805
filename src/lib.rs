pub mod core;
pub mod docs;
pub mod gate;
pub mod publishing;
pub mod validation;

pub use self::core::*;
pub use docs::{ReleaseVersion, RewriteOutcome, RewriteRules, RewriteSummary, VersionRewriter};
pub use gate::{GateAction, GateDecision, GateReport, GateRules, TaskDescriptor, TaskGate};
pub use publishing::{NexusConfig, NexusCredentials, TransitionCheckOptions};
pub use validation::{VersionValidationResult, VersionValidator};
