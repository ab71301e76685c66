//! ObjectStore trait for mocking
//!
//! This trait abstracts the Kubernetes API to enable mocking in unit tests.
//! `KubeStore` implements it against a live cluster; tests use `MockObjectStore`.

use crate::error::StoreError;

/// Get/create capability for one object kind `K`.
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait ObjectStore<K>: Send + Sync
where
    K: Send + Sync + 'static,
{
    /// Fetch `namespace/name`, returning `Ok(None)` when it does not exist.
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<K>, StoreError>;

    /// Create `object` in the namespace named by its metadata.
    ///
    /// Returns `StoreError::AlreadyExists` when an object with the same
    /// namespace/name is already present.
    async fn create(&self, object: &K) -> Result<K, StoreError>;
}
