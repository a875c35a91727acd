//! Node capacity extraction.
//!
//! First stage of the pipeline: node status → owned [`NodeCapacity`]
//! records keyed by node name. CPU, memory, and ephemeral storage are read
//! from their well-known keys as-is; GPU goes through [`GpuResolver`] for
//! capacity and allocatable independently.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use nodecap_core::{
    NodeName, NodeSnapshot, RESOURCE_CPU, RESOURCE_EPHEMERAL_STORAGE, RESOURCE_MEMORY,
    ResourceList, Resources, Taint, quantity_of,
};

use crate::gpu::GpuResolver;

/// A node's capacity and allocatable resources, before free capacity is known.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeCapacity {
    pub name: NodeName,
    pub taints: Option<Vec<Taint>>,
    pub capacity: Resources,
    pub allocatable: Resources,
}

pub type NodeCapacityMap = BTreeMap<NodeName, NodeCapacity>;

/// Normalize a resource list into the four accounted dimensions.
pub fn resources_from(list: &ResourceList, gpu: &GpuResolver) -> Resources {
    Resources {
        cpu: quantity_of(list, RESOURCE_CPU),
        memory: quantity_of(list, RESOURCE_MEMORY),
        gpu: gpu.resolve(list),
        ephemeral: quantity_of(list, RESOURCE_EPHEMERAL_STORAGE),
    }
}

/// Build the per-node capacity table from a node listing.
pub fn extract_nodes(nodes: Vec<NodeSnapshot>, gpu: &GpuResolver) -> NodeCapacityMap {
    let table: NodeCapacityMap = nodes
        .into_iter()
        .map(|node| {
            let capacity = NodeCapacity {
                capacity: resources_from(&node.capacity, gpu),
                allocatable: resources_from(&node.allocatable, gpu),
                name: node.name,
                taints: node.taints,
            };
            (capacity.name.clone(), capacity)
        })
        .collect();

    debug!(nodes = table.len(), "node capacity extracted");
    table
}
