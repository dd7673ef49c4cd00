use std::sync::Arc;
use std::time::Duration;

use k8s_openapi::api::core::v1::Pod;

use crate::cluster_api::ClusterApi;
use crate::metrics::EvictionMetrics;
use crate::report::EventSink;
use crate::shutdown::Shutdown;

/// Notified once per pod that was actually removed, including through the
/// force-delete path.
pub trait EvictionObserver: Send + Sync {
    fn on_evicted(&self, pod: &Pod);
}

/// Collaborator handles and node-independent limits for a drain, passed
/// through from the surrounding scale-down machinery.
#[derive(Clone)]
pub struct DrainContext {
    pub cluster: Arc<dyn ClusterApi>,
    pub events: Arc<dyn EventSink>,
    pub metrics: Arc<dyn EvictionMetrics>,
    pub eviction_observer: Option<Arc<dyn EvictionObserver>>,

    /// Total retry window for a single pod's eviction submissions.
    pub max_pod_eviction_time: Duration,

    pub daemon_set_eviction_for_occupied_nodes: bool,
    pub daemon_set_eviction_for_empty_nodes: bool,

    pub shutdown: Shutdown,
}
