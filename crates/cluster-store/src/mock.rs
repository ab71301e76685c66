//! Mock ObjectStore for unit testing
//!
//! Stores objects in memory keyed by namespace/name, counts every call, and
//! can be told to fail the next `get` or `create` with a given error.

use crate::error::StoreError;
use crate::store_trait::ObjectStore;
use kube::{Resource, ResourceExt};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// In-memory object store for kind `K`
///
/// Clones share state, so a test can keep a handle while the code under
/// test owns another.
#[derive(Debug)]
pub struct MockObjectStore<K> {
    objects: Arc<Mutex<BTreeMap<(String, String), K>>>,
    get_calls: Arc<Mutex<usize>>,
    create_calls: Arc<Mutex<usize>>,
    next_get_error: Arc<Mutex<Option<StoreError>>>,
    next_create_error: Arc<Mutex<Option<StoreError>>>,
}

impl<K> Clone for MockObjectStore<K> {
    fn clone(&self) -> Self {
        Self {
            objects: Arc::clone(&self.objects),
            get_calls: Arc::clone(&self.get_calls),
            create_calls: Arc::clone(&self.create_calls),
            next_get_error: Arc::clone(&self.next_get_error),
            next_create_error: Arc::clone(&self.next_create_error),
        }
    }
}

impl<K> Default for MockObjectStore<K> {
    fn default() -> Self {
        Self {
            objects: Arc::new(Mutex::new(BTreeMap::new())),
            get_calls: Arc::new(Mutex::new(0)),
            create_calls: Arc::new(Mutex::new(0)),
            next_get_error: Arc::new(Mutex::new(None)),
            next_create_error: Arc::new(Mutex::new(None)),
        }
    }
}

impl<K> MockObjectStore<K>
where
    K: Resource + Clone,
{
    /// Create an empty mock store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the mock store (for test setup)
    ///
    /// Does not count as a `create` call.
    pub fn insert(&self, object: K) {
        let key = key_of(&object);
        self.objects.lock().unwrap().insert(key, object);
    }

    /// Remove an object, as an external actor deleting it would
    pub fn remove(&self, namespace: &str, name: &str) -> Option<K> {
        self.objects
            .lock()
            .unwrap()
            .remove(&(namespace.to_string(), name.to_string()))
    }

    /// Snapshot of the stored object, if any
    pub fn stored(&self, namespace: &str, name: &str) -> Option<K> {
        self.objects
            .lock()
            .unwrap()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    /// True when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `get` calls made so far
    pub fn get_calls(&self) -> usize {
        *self.get_calls.lock().unwrap()
    }

    /// Number of `create` calls made so far
    pub fn create_calls(&self) -> usize {
        *self.create_calls.lock().unwrap()
    }

    /// Make the next `get` fail with `error`
    pub fn fail_next_get(&self, error: StoreError) {
        *self.next_get_error.lock().unwrap() = Some(error);
    }

    /// Make the next `create` fail with `error` without storing anything
    pub fn fail_next_create(&self, error: StoreError) {
        *self.next_create_error.lock().unwrap() = Some(error);
    }
}

fn key_of<K: Resource>(object: &K) -> (String, String) {
    (
        object.namespace().unwrap_or_default(),
        object.name_any(),
    )
}

#[async_trait::async_trait]
impl<K> ObjectStore<K> for MockObjectStore<K>
where
    K: Resource<DynamicType = ()> + Clone + Send + Sync + 'static,
{
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<K>, StoreError> {
        *self.get_calls.lock().unwrap() += 1;
        if let Some(error) = self.next_get_error.lock().unwrap().take() {
            return Err(error);
        }
        Ok(self.stored(namespace, name))
    }

    async fn create(&self, object: &K) -> Result<K, StoreError> {
        *self.create_calls.lock().unwrap() += 1;
        if let Some(error) = self.next_create_error.lock().unwrap().take() {
            return Err(error);
        }
        if object.meta().namespace.is_none() {
            return Err(StoreError::MissingField("metadata.namespace"));
        }

        let key = key_of(object);
        let mut objects = self.objects.lock().unwrap();
        if objects.contains_key(&key) {
            return Err(StoreError::AlreadyExists {
                kind: K::kind(&()).into_owned(),
                namespace: key.0,
                name: key.1,
            });
        }
        objects.insert(key, object.clone());
        Ok(object.clone())
    }
}
