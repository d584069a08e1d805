//! Task gate
//!
//! Decides which scheduled build tasks run, based on substring patterns
//! matched against the task path.

pub mod task_gate;

pub use task_gate::{GateAction, GateDecision, GateReport, GateRules, TaskDescriptor, TaskGate};
