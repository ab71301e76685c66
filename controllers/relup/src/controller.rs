//! Main controller implementation.
//!
//! This module contains the `Controller` struct that wires the cluster
//! stores, reconciler and watcher together for the Release Upgrade Controller.

use crate::config::ControllerConfig;
use crate::error::ControllerError;
use crate::reconciler::Reconciler;
use crate::watcher::{Context, Watcher};
use cluster_store::KubeStore;
use crds::ReleaseUpgrade;
use k8s_openapi::api::apps::v1::DaemonSet;
use kube::Client;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// Main controller for ReleaseUpgrade management.
pub struct Controller {
    release_upgrade_watcher: JoinHandle<Result<(), ControllerError>>,
}

impl Controller {
    /// Creates a new controller instance and starts its watcher.
    pub async fn new(config: ControllerConfig) -> Result<Self, ControllerError> {
        info!("Initializing Release Upgrade Controller");

        // Create Kubernetes client
        let kube_client = Client::try_default().await?;

        let upgrades: KubeStore<ReleaseUpgrade> = KubeStore::new(kube_client.clone());
        let daemonsets: KubeStore<DaemonSet> = KubeStore::new(kube_client);

        let ns = config.namespace.as_deref();
        let upgrade_api = upgrades.watch_api(ns);
        let daemonset_api = daemonsets.watch_api(ns);

        let reconciler = Reconciler::new(Box::new(upgrades), Box::new(daemonsets));
        let context = Arc::new(Context::new(reconciler, &config));

        let watcher_instance = Watcher::new(context, upgrade_api, daemonset_api, config);
        let release_upgrade_watcher = tokio::spawn(async move {
            watcher_instance.watch_release_upgrades().await
        });

        Ok(Self {
            release_upgrade_watcher,
        })
    }

    /// Runs the controller until shutdown.
    pub async fn run(self) -> Result<(), ControllerError> {
        info!("Release Upgrade Controller running");

        self.release_upgrade_watcher
            .await
            .map_err(|e| ControllerError::Watch(format!("ReleaseUpgrade watcher panicked: {e}")))??;

        info!("Release Upgrade Controller stopped");
        Ok(())
    }
}
