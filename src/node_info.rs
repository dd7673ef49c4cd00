use std::fmt;

use k8s_openapi::api::core::v1::{Node, Pod};
use kube::ResourceExt;

/// Namespace and name of a pod, as used in eviction results and errors.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct PodRef {
    pub namespace: String,
    pub name: String,
}

impl PodRef {
    pub fn from_pod(pod: &Pod) -> PodRef {
        PodRef {
            namespace: pod.namespace().unwrap_or_default(),
            name: pod.name_any(),
        }
    }
}

impl fmt::Display for PodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Namespace and name of a node. The namespace is usually empty.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct NodeRef {
    pub namespace: String,
    pub name: String,
}

impl NodeRef {
    pub fn from_node(node: &Node) -> NodeRef {
        NodeRef {
            namespace: node.namespace().unwrap_or_default(),
            name: node.name_any(),
        }
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// A node together with the pods currently scheduled on it, as supplied by
/// the cluster-state snapshot.
#[derive(Clone, Debug)]
pub struct NodeInfo {
    node: Node,
    pods: Vec<Pod>,
}

impl NodeInfo {
    pub fn new(node: Node, pods: Vec<Pod>) -> NodeInfo {
        NodeInfo { node, pods }
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn pods(&self) -> &[Pod] {
        &self.pods
    }
}
