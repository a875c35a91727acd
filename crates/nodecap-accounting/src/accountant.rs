//! Accountant: runs one reporting cycle against a cluster-state provider.
//!
//! Each cycle lists nodes, extracts capacity, lists non-terminated
//! workloads, and aggregates free capacity. Nothing is cached between
//! cycles. Either fetch failing aborts the cycle with no partial result.

use std::sync::Arc;

use tracing::{debug, info};

use nodecap_provider::ClusterStateProvider;

use crate::aggregator::{NodeReportMap, NodeRequestTotals, compute_free, node_requests_and_limits};
use crate::error::{AccountingError, AccountingResult};
use crate::extractor::extract_nodes;
use crate::gpu::GpuResolver;

/// Computes node resource reports from a provider.
#[derive(Clone)]
pub struct Accountant {
    provider: Arc<dyn ClusterStateProvider>,
    gpu: GpuResolver,
}

impl Accountant {
    pub fn new(provider: Arc<dyn ClusterStateProvider>, gpu: GpuResolver) -> Self {
        Self { provider, gpu }
    }

    pub fn gpu(&self) -> &GpuResolver {
        &self.gpu
    }

    /// Capacity, allocatable, and free resources for every node.
    pub async fn report(&self) -> AccountingResult<NodeReportMap> {
        let nodes = self
            .provider
            .list_nodes()
            .await
            .map_err(AccountingError::ListNodes)?;
        let capacities = extract_nodes(nodes, &self.gpu);

        let workloads = self
            .provider
            .list_non_terminated_workloads()
            .await
            .map_err(AccountingError::ListWorkloads)?;
        debug!(workloads = workloads.len(), "non-terminated workloads fetched");

        let reports = compute_free(capacities, &workloads, &self.gpu);
        info!(nodes = reports.len(), "node resource report computed");
        Ok(reports)
    }

    /// Summed requests and limits of the workloads bound to each node.
    pub async fn request_totals(&self) -> AccountingResult<NodeRequestTotals> {
        let workloads = self
            .provider
            .list_non_terminated_workloads()
            .await
            .map_err(AccountingError::ListWorkloads)?;

        let totals = node_requests_and_limits(&workloads);
        info!(nodes = totals.len(), "node request totals computed");
        Ok(totals)
    }
}
