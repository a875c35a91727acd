//! nodecap-provider: cluster-state providers for nodecap.
//!
//! A provider answers two point-in-time reads: every node with its
//! capacity, allocatable resources, and taints, and every non-terminated
//! workload with its bound node and per-container requests and limits.
//!
//! # Providers
//!
//! - **`live`**: live cluster through the Kubernetes API
//! - **`snapshot`**: an in-memory [`ClusterSnapshot`], optionally loaded
//!   from a JSON file (offline reports, tests)
//!
//! [`ClusterSnapshot`]: nodecap_core::ClusterSnapshot

use std::sync::Arc;

use nodecap_core::config::ClusterConfig;
use tracing::debug;

/// Convert any `Display` error into a `ProviderError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| $crate::error::ProviderError::$variant(e.to_string())
    };
}

pub mod convert;
pub mod error;
pub mod live;
pub mod provider;
pub mod snapshot;

pub use error::{ProviderError, ProviderResult};
pub use live::{KubeProvider, NON_TERMINATED_SELECTOR};
pub use provider::{ClusterStateProvider, ProviderFuture};
pub use snapshot::SnapshotProvider;

/// Build the provider selected by the cluster configuration: a snapshot
/// file when one is configured, the live cluster otherwise.
pub async fn connect(cluster: &ClusterConfig) -> ProviderResult<Arc<dyn ClusterStateProvider>> {
    match &cluster.snapshot {
        Some(path) => {
            debug!(?path, "using snapshot provider");
            Ok(Arc::new(SnapshotProvider::from_file(path)?))
        }
        None => {
            debug!(kubeconfig = ?cluster.kubeconfig, context = ?cluster.context, "using live cluster provider");
            Ok(Arc::new(KubeProvider::connect(cluster).await?))
        }
    }
}
