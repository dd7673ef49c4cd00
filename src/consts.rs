/// Marks a kubelet-managed mirror pod. Mirror pods cannot be evicted through
/// the API server.
pub const MIRROR_POD_ANNOTATION_KEY: &str = "kubernetes.io/config.mirror";

/// Marks a synthetic placeholder pod injected by the scale-down simulation.
pub const PLACEHOLDER_POD_ANNOTATION_KEY: &str = "k8s.io/cluster-autoscaler/fake-pod";

/// Per-pod override of the daemon-set eviction default. "true" opts the pod
/// in, "false" opts it out, regardless of the cluster-wide setting.
pub const DAEMON_SET_EVICTION_ANNOTATION_KEY: &str =
    "cluster-autoscaler.kubernetes.io/enable-ds-eviction";

pub const EVENT_ACTION_DRAINING: &str = "Draining";
pub const EVENT_REASON_SCALE_DOWN: &str = "ScaleDown";
pub const EVENT_REASON_SCALE_DOWN_FAILED: &str = "ScaleDownFailed";

/// Grace period assumed for pods that do not declare one.
pub const DEFAULT_TERMINATION_GRACE_PERIOD_SECONDS: i64 = 30;
