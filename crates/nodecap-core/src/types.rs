//! Domain types shared by the provider, accounting, and API crates.
//!
//! Snapshot types describe a point-in-time view of the cluster as the
//! cluster-state provider hands it over. They serialize with camelCase
//! field names so a snapshot file reads like the cluster's own objects.

use std::collections::BTreeMap;
use std::ops::{Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::quantity::Quantity;

/// Resource name → quantity, as found in node status and container specs.
pub type ResourceList = BTreeMap<String, Quantity>;

/// Unique identifier for a node in the cluster.
pub type NodeName = String;

pub const RESOURCE_CPU: &str = "cpu";
pub const RESOURCE_MEMORY: &str = "memory";
pub const RESOURCE_EPHEMERAL_STORAGE: &str = "ephemeral-storage";

/// Look up a resource, reading an absent entry as zero.
pub fn quantity_of(list: &ResourceList, name: &str) -> Quantity {
    list.get(name).copied().unwrap_or_default()
}

// ── Resources ─────────────────────────────────────────────────────

/// The four accounted resource dimensions, in native units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    /// Cores.
    pub cpu: Quantity,
    /// Bytes.
    pub memory: Quantity,
    /// Device count.
    pub gpu: Quantity,
    /// Bytes of ephemeral storage.
    pub ephemeral: Quantity,
}

impl Resources {
    pub const ZERO: Resources = Resources {
        cpu: Quantity::ZERO,
        memory: Quantity::ZERO,
        gpu: Quantity::ZERO,
        ephemeral: Quantity::ZERO,
    };
}

impl Sub for Resources {
    type Output = Resources;

    fn sub(mut self, rhs: Resources) -> Resources {
        self -= rhs;
        self
    }
}

impl SubAssign for Resources {
    fn sub_assign(&mut self, rhs: Resources) {
        self.cpu -= rhs.cpu;
        self.memory -= rhs.memory;
        self.gpu -= rhs.gpu;
        self.ephemeral -= rhs.ephemeral;
    }
}

// ── Node ──────────────────────────────────────────────────────────

/// A node taint. Carried through to the report untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Taint {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub effect: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_added: Option<String>,
}

/// A node as listed by the cluster-state provider.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSnapshot {
    pub name: NodeName,
    #[serde(default)]
    pub taints: Option<Vec<Taint>>,
    #[serde(default)]
    pub capacity: ResourceList,
    #[serde(default)]
    pub allocatable: ResourceList,
}

// ── Workload ──────────────────────────────────────────────────────

/// Lifecycle phase of a workload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkloadPhase {
    #[default]
    Pending,
    Running,
    Succeeded,
    Failed,
    #[serde(other)]
    Unknown,
}

impl WorkloadPhase {
    /// Parse the phase string reported by the cluster. Unrecognized values
    /// map to [`WorkloadPhase::Unknown`].
    pub fn from_status(phase: &str) -> Self {
        match phase {
            "Pending" => Self::Pending,
            "Running" => Self::Running,
            "Succeeded" => Self::Succeeded,
            "Failed" => Self::Failed,
            _ => Self::Unknown,
        }
    }

    /// Terminated workloads hold no claim on node resources.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// One execution unit (container) of a workload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSpec {
    pub name: String,
    #[serde(default)]
    pub requests: ResourceList,
    #[serde(default)]
    pub limits: ResourceList,
    /// Only meaningful on init containers; `Always` marks a sidecar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart_policy: Option<String>,
}

impl ContainerSpec {
    /// Whether this init container keeps running alongside the main containers.
    pub fn is_restartable(&self) -> bool {
        self.restart_policy.as_deref() == Some("Always")
    }
}

/// A workload (pod) as listed by the cluster-state provider.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadSnapshot {
    #[serde(default)]
    pub namespace: String,
    pub name: String,
    /// Node the workload is bound to, if scheduled.
    #[serde(default)]
    pub node_name: Option<NodeName>,
    #[serde(default)]
    pub phase: WorkloadPhase,
    #[serde(default)]
    pub containers: Vec<ContainerSpec>,
    #[serde(default)]
    pub init_containers: Vec<ContainerSpec>,
    /// Fixed per-pod cost charged by the runtime class.
    #[serde(default)]
    pub overhead: ResourceList,
}

// ── Snapshot ──────────────────────────────────────────────────────

/// A full point-in-time view of the cluster.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    #[serde(default)]
    pub nodes: Vec<NodeSnapshot>,
    #[serde(default)]
    pub workloads: Vec<WorkloadSnapshot>,
}
