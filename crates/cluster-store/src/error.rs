//! Cluster store errors

use thiserror::Error;

/// Errors that can occur when reading or writing cluster objects.
///
/// A missing object on `get` is not an error; it is reported as `Ok(None)`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Create lost to an object with the same namespace/name
    #[error("{kind} {namespace}/{name} already exists")]
    AlreadyExists {
        kind: String,
        namespace: String,
        name: String,
    },

    /// Object cannot be submitted without this metadata field
    #[error("object is missing {0}")]
    MissingField(&'static str),

    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] kube::Error),

    /// Backend reported a transient failure
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Returns true for the benign outcome of a lost create race.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, StoreError::AlreadyExists { .. })
    }
}
