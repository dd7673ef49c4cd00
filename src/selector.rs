use k8s_openapi::api::core::v1::Pod;
use kube::ResourceExt;

use crate::consts::{
    DAEMON_SET_EVICTION_ANNOTATION_KEY, MIRROR_POD_ANNOTATION_KEY, PLACEHOLDER_POD_ANNOTATION_KEY,
};
use crate::node_info::NodeInfo;

/// Partition a node's resident pods into daemon-set pods that should be
/// evicted and regular tenant pods. Mirror pods and placeholder pods are
/// dropped: neither can be evicted through the API.
pub(crate) fn pods_to_evict(node_info: &NodeInfo, evict_ds_by_default: bool) -> (Vec<Pod>, Vec<Pod>) {
    let mut ds_pods = Vec::new();
    let mut tenant_pods = Vec::new();

    for pod in node_info.pods() {
        if is_mirror_pod(pod) || is_placeholder_pod(pod) {
            continue;
        }

        if is_daemon_set_pod(pod) {
            ds_pods.push(pod.clone());
        } else {
            tenant_pods.push(pod.clone());
        }
    }

    let ds_pods_to_evict = ds_pods
        .into_iter()
        .filter(|pod| is_ds_eviction_enabled(pod, evict_ds_by_default))
        .collect();

    (ds_pods_to_evict, tenant_pods)
}

fn is_mirror_pod(pod: &Pod) -> bool {
    pod.annotations().contains_key(MIRROR_POD_ANNOTATION_KEY)
}

fn is_placeholder_pod(pod: &Pod) -> bool {
    pod.annotations()
        .get(PLACEHOLDER_POD_ANNOTATION_KEY)
        .map(String::as_str)
        == Some("true")
}

fn is_daemon_set_pod(pod: &Pod) -> bool {
    pod.owner_references()
        .iter()
        .any(|owner| owner.controller == Some(true) && owner.kind == "DaemonSet")
}

// An explicit annotation always wins over the cluster-wide default.
fn is_ds_eviction_enabled(pod: &Pod, evict_ds_by_default: bool) -> bool {
    match pod
        .annotations()
        .get(DAEMON_SET_EVICTION_ANNOTATION_KEY)
        .map(String::as_str)
    {
        Some("true") => true,
        Some("false") => false,
        _ => evict_ds_by_default,
    }
}
