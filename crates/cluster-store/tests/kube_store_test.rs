//! Integration tests for KubeStore
//!
//! These tests require a reachable cluster (current kubeconfig context).
//! Run with `cargo test -p cluster-store -- --ignored`.

use cluster_store::{KubeStore, ObjectStore};
use k8s_openapi::api::core::v1::ConfigMap;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::DeleteParams;

const NAMESPACE: &str = "default";

fn config_map(name: &str) -> ConfigMap {
    ConfigMap {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(NAMESPACE.to_string()),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[tokio::test]
#[ignore] // Requires a running cluster
async fn test_get_missing_object_returns_none() {
    let client = kube::Client::try_default().await.expect("Failed to create client");
    let store: KubeStore<ConfigMap> = KubeStore::new(client);

    let found = store
        .get(NAMESPACE, "cluster-store-test-does-not-exist")
        .await
        .expect("GET failed");
    assert!(found.is_none());
}

#[tokio::test]
#[ignore] // Requires a running cluster
async fn test_create_twice_reports_already_exists() {
    let client = kube::Client::try_default().await.expect("Failed to create client");
    let store: KubeStore<ConfigMap> = KubeStore::new(client);
    let name = "cluster-store-test-create-twice";

    store.create(&config_map(name)).await.expect("first create failed");
    let second = store.create(&config_map(name)).await;

    store
        .watch_api(Some(NAMESPACE))
        .delete(name, &DeleteParams::default())
        .await
        .expect("cleanup failed");

    assert!(second.expect_err("second create should fail").is_already_exists());
}
