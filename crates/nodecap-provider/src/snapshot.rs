//! SnapshotProvider: serves a fixed [`ClusterSnapshot`].
//!
//! Used for offline reports against a captured JSON snapshot and as the
//! in-memory cluster in tests. The workload read applies the same phase
//! filter the live provider pushes to the API server.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use nodecap_core::{ClusterSnapshot, NodeSnapshot, WorkloadSnapshot};

use crate::error::ProviderResult;
use crate::provider::{ClusterStateProvider, ProviderFuture};

/// Thread-safe, immutable snapshot provider.
#[derive(Debug, Clone, Default)]
pub struct SnapshotProvider {
    snapshot: Arc<ClusterSnapshot>,
}

impl SnapshotProvider {
    pub fn new(snapshot: ClusterSnapshot) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
        }
    }

    /// Load a snapshot from a JSON file.
    pub fn from_file(path: &Path) -> ProviderResult<Self> {
        let bytes = std::fs::read(path).map_err(map_err!(Read))?;
        let snapshot: ClusterSnapshot =
            serde_json::from_slice(&bytes).map_err(map_err!(Deserialize))?;
        debug!(
            ?path,
            nodes = snapshot.nodes.len(),
            workloads = snapshot.workloads.len(),
            "snapshot loaded"
        );
        Ok(Self::new(snapshot))
    }

    pub fn snapshot(&self) -> &ClusterSnapshot {
        &self.snapshot
    }
}

impl ClusterStateProvider for SnapshotProvider {
    fn list_nodes(&self) -> ProviderFuture<'_, Vec<NodeSnapshot>> {
        Box::pin(async move { Ok(self.snapshot.nodes.clone()) })
    }

    fn list_non_terminated_workloads(&self) -> ProviderFuture<'_, Vec<WorkloadSnapshot>> {
        Box::pin(async move {
            Ok(self
                .snapshot
                .workloads
                .iter()
                .filter(|w| !w.phase.is_terminal())
                .cloned()
                .collect())
        })
    }
}
