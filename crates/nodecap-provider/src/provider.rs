//! The cluster-state provider seam.

use std::future::Future;
use std::pin::Pin;

use nodecap_core::{NodeSnapshot, WorkloadSnapshot};

use crate::error::ProviderResult;

/// Boxed future alias for provider reads.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = ProviderResult<T>> + Send + 'a>>;

/// Read-only source of cluster state.
///
/// Both reads are point-in-time snapshots. Implementations never write to
/// the cluster.
pub trait ClusterStateProvider: Send + Sync {
    /// List every node with its status capacity, allocatable, and taints.
    fn list_nodes(&self) -> ProviderFuture<'_, Vec<NodeSnapshot>>;

    /// List every workload across all namespaces whose phase is neither
    /// `Succeeded` nor `Failed`.
    fn list_non_terminated_workloads(&self) -> ProviderFuture<'_, Vec<WorkloadSnapshot>>;
}
