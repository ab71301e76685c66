//! Cluster Store
//!
//! Kind-generic access to the Kubernetes API server, reduced to the
//! capabilities the release upgrade controller needs: get an object by
//! namespace and name, create an object, and hand out a kind-scoped `Api`
//! for watching.
//!
//! # Example
//!
//! ```no_run
//! use cluster_store::{KubeStore, ObjectStore};
//! use k8s_openapi::api::apps::v1::DaemonSet;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = kube::Client::try_default().await?;
//! let daemonsets: KubeStore<DaemonSet> = KubeStore::new(client);
//!
//! match daemonsets.get("default", "relup-a").await? {
//!     Some(ds) => println!("found {:?}", ds.metadata.name),
//!     None => println!("not found"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
#[path = "trait.rs"]
pub mod store_trait;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use client::KubeStore;
pub use error::StoreError;
pub use store_trait::ObjectStore;
#[cfg(any(test, feature = "test-util"))]
pub use mock::MockObjectStore;
