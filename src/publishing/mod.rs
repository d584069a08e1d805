//! Publishing target description
//!
//! The Nexus repository the release artifacts go to. Only the settings are
//! owned here; the upload itself belongs to the build tool's publish plugin.

pub mod credentials;
pub mod nexus;

pub use credentials::NexusCredentials;
pub use nexus::{NexusConfig, TransitionCheckOptions};
