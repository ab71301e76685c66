//! Controller-specific error types.
//!
//! This module defines error types specific to the Release Upgrade Controller
//! that are not covered by upstream library errors.

use cluster_store::StoreError;
use kube::Error as KubeError;
use thiserror::Error;

/// Errors that can occur in the Release Upgrade Controller.
///
/// Every error returned from a reconcile is scoped to that one attempt for
/// that one key; the dispatcher retries it with backoff.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Cluster store read or write failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Kubernetes client error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] KubeError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Resource watch failed
    #[error("Resource watch failed: {0}")]
    Watch(String),
}
