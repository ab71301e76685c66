//! Reconciliation logic for ReleaseUpgrade CRDs.
//!
//! For each `ReleaseUpgrade` this makes sure a DaemonSet of the same
//! namespace/name exists. The DaemonSet is created once and never updated:
//! later spec changes are not propagated to an existing DaemonSet.
//! Deletion is left to the API server's owner-reference garbage collection.

use crate::builder::daemonset_for_release_upgrade;
use crate::error::ControllerError;
use cluster_store::{ObjectStore, StoreError};
use crds::ReleaseUpgrade;
use k8s_openapi::api::apps::v1::DaemonSet;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// What the dispatcher should do with the key after a successful reconcile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// `None` waits for the next change; `Some(d)` reconciles again after `d`.
    pub requeue_after: Option<Duration>,
}

impl ReconcileOutcome {
    /// Converged, nothing more to do until something changes.
    pub fn done() -> Self {
        Self { requeue_after: None }
    }

    /// Reconcile again right away to observe what was just written.
    pub fn requeue_now() -> Self {
        Self {
            requeue_after: Some(Duration::ZERO),
        }
    }
}

/// Reconciles ReleaseUpgrade resources.
///
/// Holds no state besides the two store handles, so one instance can serve
/// every key concurrently.
pub struct Reconciler {
    upgrades: Box<dyn ObjectStore<ReleaseUpgrade>>,
    daemonsets: Box<dyn ObjectStore<DaemonSet>>,
}

impl Reconciler {
    /// Creates a new reconciler instance.
    pub fn new(
        upgrades: Box<dyn ObjectStore<ReleaseUpgrade>>,
        daemonsets: Box<dyn ObjectStore<DaemonSet>>,
    ) -> Self {
        Self {
            upgrades,
            daemonsets,
        }
    }

    /// Reconciles the ReleaseUpgrade `namespace/name`.
    ///
    /// This method:
    /// 1. Fetches the ReleaseUpgrade (absent means deleted: nothing to do)
    /// 2. Fetches the DaemonSet with the same namespace/name
    /// 3. If there is none, builds and creates it, then asks for an
    ///    immediate requeue to observe the result
    ///
    /// Store failures other than not-found and already-exists are returned
    /// so the dispatcher retries with backoff.
    #[instrument(skip_all, fields(releaseupgrade = %format!("{namespace}/{name}")))]
    pub async fn reconcile(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<ReconcileOutcome, ControllerError> {
        let upgrade = match self.upgrades.get(namespace, name).await {
            Ok(Some(upgrade)) => upgrade,
            Ok(None) => {
                info!("ReleaseUpgrade resource not found. Ignoring since object must be deleted");
                return Ok(ReconcileOutcome::done());
            }
            Err(e) => {
                error!("Failed to get ReleaseUpgrade: {}", e);
                return Err(e.into());
            }
        };

        info!(
            relup = ?upgrade.spec.relup,
            deployment = ?upgrade.spec.deployment.name,
            "ReleaseUpgrade spec params"
        );

        match self.daemonsets.get(namespace, name).await {
            Ok(Some(_)) => {
                debug!("DaemonSet {}/{} already exists", namespace, name);
                Ok(ReconcileOutcome::done())
            }
            Ok(None) => self.create_daemonset(&upgrade, namespace, name).await,
            Err(e) => {
                error!("Failed to get DaemonSet {}/{}: {}", namespace, name, e);
                Err(e.into())
            }
        }
    }

    async fn create_daemonset(
        &self,
        upgrade: &ReleaseUpgrade,
        namespace: &str,
        name: &str,
    ) -> Result<ReconcileOutcome, ControllerError> {
        let daemonset = daemonset_for_release_upgrade(upgrade);
        info!("Creating a new DaemonSet {}/{}", namespace, name);

        match self.daemonsets.create(&daemonset).await {
            Ok(_) => Ok(ReconcileOutcome::requeue_now()),
            Err(StoreError::AlreadyExists { .. }) => {
                info!("DaemonSet {}/{} was created concurrently", namespace, name);
                Ok(ReconcileOutcome::done())
            }
            Err(e) => {
                error!("Failed to create new DaemonSet {}/{}: {}", namespace, name, e);
                Err(e.into())
            }
        }
    }
}
