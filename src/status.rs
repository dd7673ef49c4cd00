use std::collections::HashMap;

use crate::error_types::PodEvictionError;
use crate::node_info::PodRef;

/// Outcome of one pod's eviction during a drain.
///
/// `timed_out` and `error` encode four states: never attempted
/// (`error` is [`PodEvictionError::NotAttempted`]), eviction calls exhausted
/// (`timed_out` with an error), eviction accepted but the pod still present
/// when the wait budget elapsed (`timed_out` without an error), and success
/// (neither).
#[derive(Clone, Debug)]
pub struct PodEvictionResult {
    pub pod: PodRef,
    pub timed_out: bool,
    pub error: Option<PodEvictionError>,
}

impl PodEvictionResult {
    pub fn succeeded(&self) -> bool {
        !self.timed_out && self.error.is_none()
    }
}

/// Per-pod eviction outcomes, keyed by pod name.
pub type EvictionResults = HashMap<String, PodEvictionResult>;
