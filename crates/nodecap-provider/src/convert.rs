//! Type conversions from Kubernetes API objects to snapshot types.
//!
//! Bridges `k8s_openapi::api::core::v1::{Node, Pod}` to
//! [`NodeSnapshot`] and [`WorkloadSnapshot`]. Quantities that fail to
//! parse are logged and read as zero.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{Container, Node, Pod};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity as KubeQuantity;
use tracing::warn;

use nodecap_core::{
    ContainerSpec, NodeSnapshot, Quantity, ResourceList, Taint, WorkloadPhase, WorkloadSnapshot,
};

/// Convert a [`Node`] to a [`NodeSnapshot`].
pub fn node_to_snapshot(node: &Node) -> NodeSnapshot {
    let status = node.status.as_ref();

    NodeSnapshot {
        name: node.metadata.name.clone().unwrap_or_default(),
        taints: node
            .spec
            .as_ref()
            .and_then(|spec| spec.taints.as_ref())
            .map(|taints| {
                taints
                    .iter()
                    .map(|t| Taint {
                        key: t.key.clone(),
                        value: t.value.clone(),
                        effect: t.effect.clone(),
                        time_added: t.time_added.as_ref().map(|time| time.0.to_rfc3339()),
                    })
                    .collect()
            }),
        capacity: convert_list(status.and_then(|s| s.capacity.as_ref())),
        allocatable: convert_list(status.and_then(|s| s.allocatable.as_ref())),
    }
}

/// Convert a [`Pod`] to a [`WorkloadSnapshot`].
pub fn pod_to_snapshot(pod: &Pod) -> WorkloadSnapshot {
    let spec = pod.spec.as_ref();

    WorkloadSnapshot {
        namespace: pod.metadata.namespace.clone().unwrap_or_default(),
        name: pod.metadata.name.clone().unwrap_or_default(),
        node_name: spec
            .and_then(|s| s.node_name.clone())
            .filter(|name| !name.is_empty()),
        phase: pod
            .status
            .as_ref()
            .and_then(|s| s.phase.as_deref())
            .map(WorkloadPhase::from_status)
            .unwrap_or_default(),
        containers: spec
            .map(|s| s.containers.iter().map(container_to_spec).collect())
            .unwrap_or_default(),
        init_containers: spec
            .and_then(|s| s.init_containers.as_ref())
            .map(|cs| cs.iter().map(container_to_spec).collect())
            .unwrap_or_default(),
        overhead: convert_list(spec.and_then(|s| s.overhead.as_ref())),
    }
}

fn container_to_spec(container: &Container) -> ContainerSpec {
    let resources = container.resources.as_ref();

    ContainerSpec {
        name: container.name.clone(),
        requests: convert_list(resources.and_then(|r| r.requests.as_ref())),
        limits: convert_list(resources.and_then(|r| r.limits.as_ref())),
        restart_policy: container.restart_policy.clone(),
    }
}

fn convert_list(list: Option<&BTreeMap<String, KubeQuantity>>) -> ResourceList {
    list.into_iter()
        .flatten()
        .map(|(name, raw)| (name.clone(), parse_quantity(name, &raw.0)))
        .collect()
}

fn parse_quantity(name: &str, raw: &str) -> Quantity {
    Quantity::parse(raw).unwrap_or_else(|e| {
        warn!(resource = %name, value = %raw, error = %e, "malformed quantity, reading as zero");
        Quantity::ZERO
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::{
        NodeSpec, NodeStatus, PodSpec, PodStatus, ResourceRequirements, Taint as KubeTaint,
    };
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use nodecap_core::{RESOURCE_CPU, RESOURCE_EPHEMERAL_STORAGE, RESOURCE_MEMORY, quantity_of};

    fn kube_list(entries: &[(&str, &str)]) -> BTreeMap<String, KubeQuantity> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), KubeQuantity(v.to_string())))
            .collect()
    }

    fn sample_node() -> Node {
        Node {
            metadata: ObjectMeta {
                name: Some("node-2".to_string()),
                ..Default::default()
            },
            spec: Some(NodeSpec {
                taints: Some(vec![KubeTaint {
                    key: "dedicated".to_string(),
                    value: Some("gpu".to_string()),
                    effect: "NoSchedule".to_string(),
                    time_added: None,
                }]),
                ..Default::default()
            }),
            status: Some(NodeStatus {
                capacity: Some(kube_list(&[
                    ("cpu", "16"),
                    ("memory", "64Gi"),
                    ("nvidia.com/gpu", "2"),
                ])),
                allocatable: Some(kube_list(&[
                    ("cpu", "15500m"),
                    ("memory", "60Gi"),
                    ("ephemeral-storage", "not-a-number"),
                ])),
                ..Default::default()
            }),
        }
    }

    fn sample_pod() -> Pod {
        Pod {
            metadata: ObjectMeta {
                name: Some("pod-1".to_string()),
                namespace: Some("default".to_string()),
                ..Default::default()
            },
            spec: Some(PodSpec {
                node_name: Some("node-2".to_string()),
                containers: vec![Container {
                    name: "ubuntu".to_string(),
                    resources: Some(ResourceRequirements {
                        requests: Some(kube_list(&[("cpu", "4"), ("ephemeral-storage", "4")])),
                        limits: Some(kube_list(&[("memory", "2Gi")])),
                        ..Default::default()
                    }),
                    ..Default::default()
                }],
                init_containers: Some(vec![Container {
                    name: "proxy".to_string(),
                    restart_policy: Some("Always".to_string()),
                    ..Default::default()
                }]),
                overhead: Some(kube_list(&[("cpu", "250m")])),
                ..Default::default()
            }),
            status: Some(PodStatus {
                phase: Some("Running".to_string()),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn converts_node_fields() {
        let snapshot = node_to_snapshot(&sample_node());

        assert_eq!(snapshot.name, "node-2");
        assert_eq!(quantity_of(&snapshot.capacity, RESOURCE_CPU), Quantity::from_units(16));
        assert_eq!(
            quantity_of(&snapshot.capacity, RESOURCE_MEMORY),
            Quantity::from_units(64 * 1024 * 1024 * 1024)
        );
        assert_eq!(quantity_of(&snapshot.capacity, "nvidia.com/gpu"), Quantity::from_units(2));
        assert_eq!(quantity_of(&snapshot.allocatable, RESOURCE_CPU), Quantity::from_milli(15_500));
    }

    #[test]
    fn preserves_taints() {
        let snapshot = node_to_snapshot(&sample_node());
        let taints = snapshot.taints.unwrap();

        assert_eq!(taints.len(), 1);
        assert_eq!(taints[0].key, "dedicated");
        assert_eq!(taints[0].value.as_deref(), Some("gpu"));
        assert_eq!(taints[0].effect, "NoSchedule");
    }

    #[test]
    fn node_without_taints_has_none() {
        let mut node = sample_node();
        node.spec = None;
        assert!(node_to_snapshot(&node).taints.is_none());
    }

    #[test]
    fn malformed_quantity_reads_as_zero() {
        let snapshot = node_to_snapshot(&sample_node());
        assert_eq!(
            quantity_of(&snapshot.allocatable, RESOURCE_EPHEMERAL_STORAGE),
            Quantity::ZERO
        );
    }

    #[test]
    fn converts_pod_fields() {
        let workload = pod_to_snapshot(&sample_pod());

        assert_eq!(workload.namespace, "default");
        assert_eq!(workload.name, "pod-1");
        assert_eq!(workload.node_name.as_deref(), Some("node-2"));
        assert_eq!(workload.phase, WorkloadPhase::Running);
        assert_eq!(workload.containers.len(), 1);
        assert_eq!(
            quantity_of(&workload.containers[0].requests, RESOURCE_CPU),
            Quantity::from_units(4)
        );
        assert_eq!(
            quantity_of(&workload.containers[0].limits, RESOURCE_MEMORY),
            Quantity::from_units(2 * 1024 * 1024 * 1024)
        );
        assert!(workload.init_containers[0].is_restartable());
        assert_eq!(quantity_of(&workload.overhead, RESOURCE_CPU), Quantity::from_milli(250));
    }

    #[test]
    fn empty_node_name_is_unscheduled() {
        let mut pod = sample_pod();
        pod.spec.as_mut().unwrap().node_name = Some(String::new());
        assert!(pod_to_snapshot(&pod).node_name.is_none());
    }

    #[test]
    fn missing_status_defaults_to_pending() {
        let mut pod = sample_pod();
        pod.status = None;
        assert_eq!(pod_to_snapshot(&pod).phase, WorkloadPhase::Pending);
    }
}
