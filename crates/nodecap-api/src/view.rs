//! JSON presentation of node reports.
//!
//! CPU renders as decimal cores; memory and ephemeral storage as integer
//! bytes; GPU as an integer count. Integers round up away from zero. A node
//! without taints renders an empty list.

use serde::{Deserialize, Serialize};

use nodecap_accounting::{NodeReport, NodeReportMap};
use nodecap_core::{Resources, Taint};

/// One resource record in presentation units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourcesView {
    pub cpu: f64,
    pub memory: i64,
    pub gpu: i64,
    pub ephemeral: i64,
}

impl From<Resources> for ResourcesView {
    fn from(r: Resources) -> Self {
        Self {
            cpu: r.cpu.as_f64(),
            memory: r.memory.ceil_units(),
            gpu: r.gpu.ceil_units(),
            ephemeral: r.ephemeral.ceil_units(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeView {
    pub name: String,
    pub taints: Vec<Taint>,
    pub capacity: ResourcesView,
    pub allocatable: ResourcesView,
    pub free: ResourcesView,
}

impl From<NodeReport> for NodeView {
    fn from(report: NodeReport) -> Self {
        Self {
            name: report.name,
            taints: report.taints.unwrap_or_default(),
            capacity: report.capacity.into(),
            allocatable: report.allocatable.into(),
            free: report.free.into(),
        }
    }
}

/// Views for every node, ordered by name.
pub fn node_views(reports: NodeReportMap) -> Vec<NodeView> {
    reports.into_values().map(NodeView::from).collect()
}
