//! Kubernetes-backed object store.

use crate::error::StoreError;
use crate::store_trait::ObjectStore;
use k8s_openapi::NamespaceResourceScope;
use kube::api::PostParams;
use kube::{Api, Client, Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::marker::PhantomData;
use tracing::debug;

/// Object store for namespaced kind `K`, backed by a Kubernetes client.
pub struct KubeStore<K> {
    client: Client,
    _kind: PhantomData<fn() -> K>,
}

impl<K> Clone for KubeStore<K> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K> Debug for KubeStore<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeStore").finish_non_exhaustive()
    }
}

impl<K> KubeStore<K>
where
    K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
        + Clone
        + Debug
        + DeserializeOwned
        + Serialize,
{
    /// Creates a new store over `client`.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            _kind: PhantomData,
        }
    }

    /// Kind-scoped API used to watch `K`, either in one namespace or cluster-wide.
    pub fn watch_api(&self, namespace: Option<&str>) -> Api<K> {
        match namespace {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        }
    }
}

#[async_trait::async_trait]
impl<K> ObjectStore<K> for KubeStore<K>
where
    K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
        + Clone
        + Debug
        + DeserializeOwned
        + Serialize
        + Send
        + Sync
        + 'static,
{
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<K>, StoreError> {
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        debug!("GET {} {}/{}", K::kind(&()), namespace, name);
        Ok(api.get_opt(name).await?)
    }

    async fn create(&self, object: &K) -> Result<K, StoreError> {
        let namespace = object
            .meta()
            .namespace
            .as_deref()
            .ok_or(StoreError::MissingField("metadata.namespace"))?;
        let name = object.name_any();
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        debug!("CREATE {} {}/{}", K::kind(&()), namespace, name);

        match api.create(&PostParams::default(), object).await {
            Ok(created) => Ok(created),
            Err(kube::Error::Api(ae)) if ae.code == 409 => Err(StoreError::AlreadyExists {
                kind: K::kind(&()).into_owned(),
                namespace: namespace.to_string(),
                name,
            }),
            Err(e) => Err(e.into()),
        }
    }
}
