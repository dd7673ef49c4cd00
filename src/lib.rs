mod cluster_api;
mod config;
mod consts;
mod context;
mod error_codes;
mod error_types;
mod evictor;
mod metrics;
mod node_info;
mod priority;
mod report;
mod selector;
mod shutdown;
mod status;
mod utils;

pub use crate::cluster_api::{ClusterApi, KubeClusterApi};
pub use crate::config::{
    DEFAULT_EVICTION_RETRY_INTERVAL, DEFAULT_POD_EVICTION_HEADROOM, DrainConfig,
};
pub use crate::context::{DrainContext, EvictionObserver};
pub use crate::error_types::{DrainError, DrainFailure, PodEvictionError};
pub use crate::evictor::Evictor;
pub use crate::metrics::{DrainMetrics, EvictionMetrics, EvictionOutcome, NoopEvictionMetrics};
pub use crate::node_info::{NodeInfo, NodeRef, PodRef};
pub use crate::priority::ShutdownGracePeriodByPodPriority;
pub use crate::report::{EventSink, KubeEventSink};
pub use crate::shutdown::Shutdown;
pub use crate::status::{EvictionResults, PodEvictionResult};
