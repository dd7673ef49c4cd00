use thiserror::Error;

use crate::node_info::{NodeRef, PodRef};
use crate::status::EvictionResults;

/// Failure of a single pod's eviction, recorded in the result map.
#[derive(Clone, Debug, Error)]
pub enum PodEvictionError {
    #[error("eviction was not attempted for pod {pod} because an earlier eviction group failed")]
    NotAttempted { pod: PodRef },

    #[error("failed to evict pod {pod} within the allowed timeout (last error: {last_error})")]
    EvictionTimedOut { pod: PodRef, last_error: String },

    #[error("failed to forcefully delete unevicted pod {pod}: {reason}")]
    ForceDeleteFailed { pod: PodRef, reason: String },

    #[error("failed to check pod {pod}: {reason}")]
    StatusCheckFailed { pod: PodRef, reason: String },
}

/// Node-level failure that aborts the walk over the eviction groups.
#[derive(Debug, Error)]
pub enum DrainFailure {
    #[error("failed to drain node {node}, due to following errors: [{}]", format_errors(.errors))]
    EvictionsFailed {
        node: NodeRef,
        errors: Vec<PodEvictionError>,
    },

    #[error("failed to drain node {node}: pods remaining after timeout")]
    PodsRemaining { node: NodeRef },
}

impl DrainFailure {
    /// Evictions were accepted but pods were still present when the wait
    /// budget ran out. Worth retrying, unlike an eviction-call failure.
    pub fn is_transient(&self) -> bool {
        matches!(self, DrainFailure::PodsRemaining { .. })
    }
}

fn format_errors(errors: &[PodEvictionError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A failed drain. Carries the per-pod results accumulated so far, so a
/// caller can tell pods that were never tried apart from pods that failed.
#[derive(Debug, Error)]
#[error("{failure}")]
pub struct DrainError {
    pub failure: DrainFailure,
    pub results: EvictionResults,
}
