//! Effective resource requests and limits for a workload.
//!
//! Mirrors the scheduler's per-pod accounting:
//! - regular containers are summed
//! - restartable init containers (sidecars) run for the pod's lifetime, so
//!   they add to the sum and stay in effect for later init containers
//! - an ordinary init container needs its own requests plus the sidecars
//!   started before it; the pod needs the per-resource maximum of that and
//!   the container sum
//! - pod overhead is added to every request, and to a limit only when the
//!   pod already carries a limit for that resource
//!
//! A container that sets a limit but no request is accounted with the limit
//! as its request, which is the default the API server applies.

use serde::Serialize;

use nodecap_core::{ContainerSpec, ResourceList, WorkloadSnapshot};

/// Reconciled per-resource totals for one workload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestsAndLimits {
    pub requests: ResourceList,
    pub limits: ResourceList,
}

/// Compute the effective requests and limits of a workload.
pub fn pod_requests_and_limits(workload: &WorkloadSnapshot) -> RequestsAndLimits {
    let mut requests = accumulate(workload, effective_requests);
    add_into(&mut requests, &workload.overhead);

    let mut limits = accumulate(workload, |c| c.limits.clone());
    for (name, overhead) in &workload.overhead {
        if let Some(limit) = limits.get_mut(name) {
            *limit += *overhead;
        }
    }

    RequestsAndLimits { requests, limits }
}

fn effective_requests(container: &ContainerSpec) -> ResourceList {
    let mut requests = container.requests.clone();
    for (name, limit) in &container.limits {
        requests.entry(name.clone()).or_insert(*limit);
    }
    requests
}

fn accumulate<F>(workload: &WorkloadSnapshot, per_container: F) -> ResourceList
where
    F: Fn(&ContainerSpec) -> ResourceList,
{
    let mut total = ResourceList::new();
    for container in &workload.containers {
        add_into(&mut total, &per_container(container));
    }

    let mut sidecars = ResourceList::new();
    let mut init_peak = ResourceList::new();
    for container in &workload.init_containers {
        let own = per_container(container);
        let in_effect = if container.is_restartable() {
            add_into(&mut total, &own);
            add_into(&mut sidecars, &own);
            sidecars.clone()
        } else {
            let mut combined = own;
            add_into(&mut combined, &sidecars);
            combined
        };
        max_into(&mut init_peak, &in_effect);
    }

    max_into(&mut total, &init_peak);
    total
}

fn add_into(target: &mut ResourceList, other: &ResourceList) {
    for (name, value) in other {
        *target.entry(name.clone()).or_default() += *value;
    }
}

fn max_into(target: &mut ResourceList, other: &ResourceList) {
    for (name, value) in other {
        let current = target.entry(name.clone()).or_insert(*value);
        if *value > *current {
            *current = *value;
        }
    }
}
