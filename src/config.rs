use std::time::Duration;

use crate::priority::ShutdownGracePeriodByPodPriority;

pub const DEFAULT_EVICTION_RETRY_INTERVAL: Duration = Duration::from_secs(10);

/// Extra time after a group's shutdown grace to catch pods that ignore
/// SIGTERM and are killed with SIGKILL once the grace elapses.
pub const DEFAULT_POD_EVICTION_HEADROOM: Duration = Duration::from_secs(30);

/// Tunables of the drain core.
#[derive(Clone, Debug)]
pub struct DrainConfig {
    /// Gap between eviction retries for a single pod.
    pub eviction_retry_interval: Duration,

    /// Extra wait after a group's shutdown grace before the disappearance
    /// wait is declared timed out.
    pub pod_eviction_headroom: Duration,

    /// Priority ceilings mapped to shutdown grace seconds. An empty table
    /// puts every pod in a single group with no grace cap.
    pub shutdown_grace_period_by_pod_priority: Vec<ShutdownGracePeriodByPodPriority>,

    /// Treat daemon-set pods as full-eviction pods instead of best-effort.
    pub full_ds_eviction: bool,
}

impl Default for DrainConfig {
    fn default() -> DrainConfig {
        DrainConfig {
            eviction_retry_interval: DEFAULT_EVICTION_RETRY_INTERVAL,
            pod_eviction_headroom: DEFAULT_POD_EVICTION_HEADROOM,
            shutdown_grace_period_by_pod_priority: Vec::new(),
            full_ds_eviction: false,
        }
    }
}
