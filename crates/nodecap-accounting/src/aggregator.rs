//! Free-capacity aggregation.
//!
//! Second stage of the pipeline. Takes ownership of the extracted
//! [`NodeCapacityMap`], seeds every node's free capacity with a copy of its
//! allocatable resources, and subtracts the effective requests of each
//! workload bound to it. Free capacity is not clamped: over-committed nodes
//! report negative values.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use nodecap_core::{NodeName, Resources, Taint, WorkloadSnapshot};

use crate::extractor::{NodeCapacity, NodeCapacityMap, resources_from};
use crate::gpu::GpuResolver;
use crate::requests::{RequestsAndLimits, pod_requests_and_limits};

/// A node with capacity, allocatable, and free resources.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeReport {
    pub name: NodeName,
    pub taints: Option<Vec<Taint>>,
    pub capacity: Resources,
    pub allocatable: Resources,
    pub free: Resources,
}

impl From<NodeCapacity> for NodeReport {
    fn from(node: NodeCapacity) -> Self {
        Self {
            free: node.allocatable,
            name: node.name,
            taints: node.taints,
            capacity: node.capacity,
            allocatable: node.allocatable,
        }
    }
}

pub type NodeReportMap = BTreeMap<NodeName, NodeReport>;

/// Summed requests and limits of every workload bound to a node, across
/// all resource names.
pub type NodeRequestTotals = BTreeMap<NodeName, RequestsAndLimits>;

/// The four accounted dimensions a workload requests.
pub fn workload_requests(workload: &WorkloadSnapshot, gpu: &GpuResolver) -> Resources {
    resources_from(&pod_requests_and_limits(workload).requests, gpu)
}

/// Fill in free capacity for every node. Workloads bound to a node outside
/// `nodes`, or to no node at all, are skipped.
pub fn compute_free(
    nodes: NodeCapacityMap,
    workloads: &[WorkloadSnapshot],
    gpu: &GpuResolver,
) -> NodeReportMap {
    let mut reports: NodeReportMap = nodes
        .into_iter()
        .map(|(name, node)| (name, NodeReport::from(node)))
        .collect();

    let mut counted = 0usize;
    for workload in workloads {
        let Some(report) = workload
            .node_name
            .as_deref()
            .and_then(|name| reports.get_mut(name))
        else {
            debug!(
                namespace = %workload.namespace,
                workload = %workload.name,
                node = ?workload.node_name,
                "workload not bound to a known node, skipping"
            );
            continue;
        };

        report.free -= workload_requests(workload, gpu);
        counted += 1;
    }

    debug!(nodes = reports.len(), workloads = counted, "free capacity computed");
    reports
}

/// Sum effective requests and limits per node. Unbound workloads are skipped.
pub fn node_requests_and_limits(workloads: &[WorkloadSnapshot]) -> NodeRequestTotals {
    let mut totals = NodeRequestTotals::new();

    for workload in workloads {
        let Some(node) = workload.node_name.as_ref() else {
            continue;
        };
        let pod = pod_requests_and_limits(workload);
        let entry = totals.entry(node.clone()).or_default();
        for (name, value) in pod.requests {
            *entry.requests.entry(name).or_default() += value;
        }
        for (name, value) in pod.limits {
            *entry.limits.entry(name).or_default() += value;
        }
    }

    totals
}
