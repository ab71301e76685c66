//! Test utilities for unit testing the reconciler and builder
//!
//! This module provides helpers for creating test data and setting up test scenarios.

#[cfg(test)]
use crate::reconciler::Reconciler;
#[cfg(test)]
use cluster_store::MockObjectStore;
#[cfg(test)]
use crds::*;
#[cfg(test)]
use k8s_openapi::api::apps::v1::DaemonSet;
#[cfg(test)]
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// Helper to create a test ReleaseUpgrade
#[cfg(test)]
pub fn create_test_release_upgrade(
    name: &str,
    namespace: &str,
    image: &str,
    tarball: &str,
    host_path: &str,
) -> ReleaseUpgrade {
    ReleaseUpgrade {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            uid: Some(format!("uid-{name}")),
            ..Default::default()
        },
        spec: ReleaseUpgradeSpec {
            relup: ReleaseUpgradeImageSpec {
                name: Some(format!("{name}-img")),
                image: Some(image.to_string()),
                tarball: Some(tarball.to_string()),
                source_version: Some("1.1".to_string()),
                target_version: Some("1.2".to_string()),
            },
            volume: ReleaseUpgradeVolumeSpec {
                host_path: Some(host_path.to_string()),
            },
            deployment: ReleaseUpgradeDeploymentSpec {
                name: Some("simple-web-service".to_string()),
            },
        },
        status: None,
    }
}

/// The `relup-a` upgrade used across scenario tests
#[cfg(test)]
pub fn relup_a() -> ReleaseUpgrade {
    create_test_release_upgrade(
        "relup-a",
        "default",
        "registry/relup:1.2",
        "/opt/relup.tar.gz",
        "/var/lib/relup",
    )
}

/// Mock stores plus a reconciler wired to them
#[cfg(test)]
pub struct TestHarness {
    pub upgrades: MockObjectStore<ReleaseUpgrade>,
    pub daemonsets: MockObjectStore<DaemonSet>,
    pub reconciler: Reconciler,
}

#[cfg(test)]
impl TestHarness {
    /// Empty stores
    pub fn new() -> Self {
        let upgrades = MockObjectStore::new();
        let daemonsets = MockObjectStore::new();
        let reconciler = Reconciler::new(Box::new(upgrades.clone()), Box::new(daemonsets.clone()));
        Self {
            upgrades,
            daemonsets,
            reconciler,
        }
    }

    /// Stores seeded with `upgrade`
    pub fn with_upgrade(upgrade: ReleaseUpgrade) -> Self {
        let harness = Self::new();
        harness.upgrades.insert(upgrade);
        harness
    }
}
