//! Kubernetes resource watchers.
//!
//! Drives the reconciler from a `kube_runtime::Controller`: a work queue that
//! hands each ReleaseUpgrade key to at most one worker at a time, with a
//! bounded number of workers overall. Changes to owned DaemonSets re-trigger
//! their owner's key.

use crate::backoff::RetryBackoff;
use crate::config::ControllerConfig;
use crate::error::ControllerError;
use crate::reconciler::{ReconcileOutcome, Reconciler};
use crds::ReleaseUpgrade;
use futures::StreamExt;
use k8s_openapi::api::apps::v1::DaemonSet;
use kube::api::ListParams;
use kube::{Api, ResourceExt};
use kube_runtime::controller::{Action, Config as RuntimeConfig};
use kube_runtime::reflector::ObjectRef;
use kube_runtime::{Controller, watcher};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Shared state handed to every reconcile and error-policy call.
pub struct Context {
    pub(crate) reconciler: Reconciler,
    pub(crate) backoff: RetryBackoff<ObjectRef<ReleaseUpgrade>>,
}

impl Context {
    /// Creates the context with an empty failure history.
    pub fn new(reconciler: Reconciler, config: &ControllerConfig) -> Self {
        Self {
            reconciler,
            backoff: RetryBackoff::new(config.backoff_min, config.backoff_max),
        }
    }
}

/// Maps a reconcile outcome onto the runtime's requeue action.
pub fn to_action(outcome: ReconcileOutcome) -> Action {
    match outcome.requeue_after {
        Some(delay) => Action::requeue(delay),
        None => Action::await_change(),
    }
}

/// Reconcile entry point registered with the runtime controller.
///
/// Only the key of the cached object is used; the reconciler fetches the
/// current object itself.
pub async fn reconcile(
    upgrade: Arc<ReleaseUpgrade>,
    ctx: Arc<Context>,
) -> Result<Action, ControllerError> {
    let key = ObjectRef::from_obj(upgrade.as_ref());
    let namespace = upgrade.namespace().unwrap_or_else(|| "default".to_string());
    let name = upgrade.name_any();

    let outcome = ctx.reconciler.reconcile(&namespace, &name).await?;
    ctx.backoff.reset(&key);
    Ok(to_action(outcome))
}

/// Error policy: requeue the failed key with Fibonacci backoff.
pub fn error_policy(
    upgrade: Arc<ReleaseUpgrade>,
    error: &ControllerError,
    ctx: Arc<Context>,
) -> Action {
    let key = ObjectRef::from_obj(upgrade.as_ref());
    let delay = ctx.backoff.next_delay(&key);
    error!(
        "Reconciliation error for ReleaseUpgrade {}: {} (attempt {}, retrying in {:?})",
        key,
        error,
        ctx.backoff.failures(&key),
        delay
    );
    Action::requeue(delay)
}

/// Watches ReleaseUpgrade resources (and their DaemonSets) for changes.
pub struct Watcher {
    context: Arc<Context>,
    upgrade_api: Api<ReleaseUpgrade>,
    daemonset_api: Api<DaemonSet>,
    config: ControllerConfig,
}

impl Watcher {
    /// Creates a new watcher instance.
    pub fn new(
        context: Arc<Context>,
        upgrade_api: Api<ReleaseUpgrade>,
        daemonset_api: Api<DaemonSet>,
        config: ControllerConfig,
    ) -> Self {
        Self {
            context,
            upgrade_api,
            daemonset_api,
            config,
        }
    }

    /// Runs the reconcile loop until a shutdown signal is received.
    pub async fn watch_release_upgrades(&self) -> Result<(), ControllerError> {
        info!("Starting ReleaseUpgrade watcher");

        // Fail fast when the CRD is not installed
        self.upgrade_api
            .list(&ListParams::default().limit(1))
            .await
            .map_err(|e| {
                ControllerError::Watch(format!(
                    "ReleaseUpgrade CRD is not queryable (is it installed?): {e}"
                ))
            })?;

        let runtime_config = RuntimeConfig::default()
            .debounce(self.config.debounce)
            .concurrency(self.config.concurrency);

        Controller::new(self.upgrade_api.clone(), watcher::Config::default())
            .owns(self.daemonset_api.clone(), watcher::Config::default())
            .with_config(runtime_config)
            .shutdown_on_signal()
            .run(reconcile, error_policy, Arc::clone(&self.context))
            .for_each(|res| async move {
                match res {
                    Ok((obj, action)) => debug!("Reconciled {}: {:?}", obj, action),
                    Err(e) => warn!("Controller error: {}", e),
                }
            })
            .await;

        info!("ReleaseUpgrade watcher stopped");
        Ok(())
    }
}
