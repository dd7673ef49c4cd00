use k8s_openapi::api::core::v1::{Node, Pod};
use kube::ResourceExt;

use crate::node_info::NodeInfo;
use crate::tests::utils::from_json;

pub const TEST_NODE: &str = "node-1";

pub fn tenant_pod(name: &str, priority: i32) -> Pod {
    from_json!({
        "metadata": { "namespace": "default", "name": name },
        "spec": {
            "containers": [],
            "nodeName": TEST_NODE,
            "priority": priority,
        },
    })
}

pub fn tenant_pod_with_grace(name: &str, priority: i32, grace_seconds: i64) -> Pod {
    from_json!({
        "metadata": { "namespace": "default", "name": name },
        "spec": {
            "containers": [],
            "nodeName": TEST_NODE,
            "priority": priority,
            "terminationGracePeriodSeconds": grace_seconds,
        },
    })
}

pub fn daemon_set_pod(name: &str) -> Pod {
    from_json!({
        "metadata": {
            "namespace": "kube-system",
            "name": name,
            "ownerReferences": [
                { "apiVersion": "apps/v1", "kind": "DaemonSet", "name": "ds",
                  "uid": "ds-uid", "controller": true },
            ],
        },
        "spec": { "containers": [], "nodeName": TEST_NODE },
    })
}

pub fn mirror_pod(name: &str) -> Pod {
    from_json!({
        "metadata": {
            "namespace": "kube-system",
            "name": name,
            "annotations": { "kubernetes.io/config.mirror": "d41d8cd9" },
        },
        "spec": { "containers": [], "nodeName": TEST_NODE },
    })
}

pub fn placeholder_pod(name: &str) -> Pod {
    from_json!({
        "metadata": {
            "namespace": "default",
            "name": name,
            "annotations": { "k8s.io/cluster-autoscaler/fake-pod": "true" },
        },
        "spec": { "containers": [], "nodeName": TEST_NODE },
    })
}

pub fn with_annotation(mut pod: Pod, key: &str, value: &str) -> Pod {
    pod.annotations_mut()
        .insert(key.to_string(), value.to_string());
    pod
}

/// A [`NodeInfo`] for [`TEST_NODE`] holding the given pods.
pub fn node_info(pods: Vec<Pod>) -> NodeInfo {
    let node: Node = from_json!({ "metadata": { "name": TEST_NODE } });
    NodeInfo::new(node, pods)
}
