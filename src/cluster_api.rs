use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::Client;
use kube::api::{Api, DeleteParams, EvictParams};

use crate::node_info::PodRef;

/// The slice of the cluster API the drain core talks to. A trait so tests
/// can substitute a scripted cluster for the real API server.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// Submit an eviction for the pod, with the given termination grace.
    async fn evict(&self, pod: &PodRef, grace_period_seconds: i64) -> kube::Result<()>;

    /// Delete the pod outright, bypassing eviction.
    async fn delete_pod(&self, pod: &PodRef) -> kube::Result<()>;

    /// Fetch the pod's current record.
    async fn get_pod(&self, pod: &PodRef) -> kube::Result<Pod>;
}

/// [`ClusterApi`] backed by a real API server connection.
#[derive(Clone)]
pub struct KubeClusterApi {
    client: Client,
}

impl KubeClusterApi {
    pub fn new(client: Client) -> KubeClusterApi {
        KubeClusterApi { client }
    }

    fn pods(&self, namespace: &str) -> Api<Pod> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl ClusterApi for KubeClusterApi {
    async fn evict(&self, pod: &PodRef, grace_period_seconds: i64) -> kube::Result<()> {
        let params = EvictParams {
            delete_options: Some(DeleteParams {
                grace_period_seconds: Some(
                    u32::try_from(grace_period_seconds.max(0)).unwrap_or(u32::MAX),
                ),
                ..DeleteParams::default()
            }),
            ..EvictParams::default()
        };

        self.pods(&pod.namespace).evict(&pod.name, &params).await?;
        Ok(())
    }

    async fn delete_pod(&self, pod: &PodRef) -> kube::Result<()> {
        self.pods(&pod.namespace)
            .delete(&pod.name, &DeleteParams::default())
            .await?;
        Ok(())
    }

    async fn get_pod(&self, pod: &PodRef) -> kube::Result<Pod> {
        self.pods(&pod.namespace).get(&pod.name).await
    }
}
