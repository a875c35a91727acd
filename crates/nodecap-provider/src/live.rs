//! Live cluster provider backed by the Kubernetes API.

use k8s_openapi::api::core::v1::{Node, Pod};
use kube::api::{Api, ListParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use tracing::debug;

use nodecap_core::config::ClusterConfig;
use nodecap_core::{NodeSnapshot, WorkloadSnapshot};

use crate::convert::{node_to_snapshot, pod_to_snapshot};
use crate::error::ProviderResult;
use crate::provider::{ClusterStateProvider, ProviderFuture};

/// Server-side filter that drops terminated workloads from the pod list.
pub const NON_TERMINATED_SELECTOR: &str = "status.phase!=Succeeded,status.phase!=Failed";

/// Reads nodes and pods from a live cluster.
#[derive(Clone)]
pub struct KubeProvider {
    client: Client,
}

impl KubeProvider {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the configured kubeconfig, or infer one from the
    /// environment when no path is given.
    pub async fn connect(cluster: &ClusterConfig) -> ProviderResult<Self> {
        let options = KubeConfigOptions {
            context: cluster.context.clone(),
            ..Default::default()
        };

        let config = match (&cluster.kubeconfig, &cluster.context) {
            (Some(path), _) => {
                let kubeconfig = Kubeconfig::read_from(path).map_err(map_err!(Config))?;
                Config::from_custom_kubeconfig(kubeconfig, &options)
                    .await
                    .map_err(map_err!(Config))?
            }
            (None, Some(_)) => Config::from_kubeconfig(&options)
                .await
                .map_err(map_err!(Config))?,
            (None, None) => Config::infer().await.map_err(map_err!(Config))?,
        };
        debug!(cluster_url = %config.cluster_url, "cluster client configured");

        let client = Client::try_from(config).map_err(map_err!(Config))?;
        Ok(Self::new(client))
    }
}

impl ClusterStateProvider for KubeProvider {
    fn list_nodes(&self) -> ProviderFuture<'_, Vec<NodeSnapshot>> {
        Box::pin(async move {
            let api: Api<Node> = Api::all(self.client.clone());
            let list = api
                .list(&ListParams::default())
                .await
                .map_err(map_err!(Request))?;
            debug!(count = list.items.len(), "nodes listed");
            Ok(list.items.iter().map(node_to_snapshot).collect())
        })
    }

    fn list_non_terminated_workloads(&self) -> ProviderFuture<'_, Vec<WorkloadSnapshot>> {
        Box::pin(async move {
            let api: Api<Pod> = Api::all(self.client.clone());
            let params = ListParams::default().fields(NON_TERMINATED_SELECTOR);
            let list = api.list(&params).await.map_err(map_err!(Request))?;
            debug!(count = list.items.len(), "non-terminated pods listed");
            Ok(list.items.iter().map(pod_to_snapshot).collect())
        })
    }
}
