//! Release Upgrade CRD Definitions
//!
//! Kubernetes Custom Resource Definitions for the release upgrade controller.

pub mod release_upgrade;

pub use release_upgrade::*;
