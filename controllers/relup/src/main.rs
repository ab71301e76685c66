//! Release Upgrade Controller
//!
//! Stages release upgrade tarballs onto every node of the cluster.
//!
//! This controller reconciles `ReleaseUpgrade` CRDs: for each one it creates
//! a DaemonSet of the same name whose pods copy the upgrade tarball out of
//! the upgrade image into a host-path directory and then idle.

mod backoff;
mod builder;
mod config;
mod controller;
mod error;
mod reconciler;
mod watcher;

mod test_utils;
mod reconciler_test;

use crate::config::ControllerConfig;
use crate::error::ControllerError;
use controller::Controller;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Release Upgrade Controller");

    // Load configuration from environment variables
    let config = ControllerConfig::from_env()?;

    info!("Configuration:");
    info!("  Namespace: {}", config.namespace.as_deref().unwrap_or("all namespaces"));
    info!("  Concurrency: {}", config.concurrency);
    info!("  Debounce: {:?}", config.debounce);
    info!("  Retry backoff: {:?} .. {:?}", config.backoff_min, config.backoff_max);

    // Initialize and run controller
    let controller = Controller::new(config).await?;
    controller.run().await?;

    Ok(())
}
