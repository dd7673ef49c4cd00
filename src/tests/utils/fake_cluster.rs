use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::error::ErrorResponse;
use tokio::time::Instant;

use crate::cluster_api::ClusterApi;
use crate::node_info::PodRef;

#[derive(Clone, Debug, PartialEq)]
pub enum CallKind {
    Evict { grace_period_seconds: i64 },
    Delete,
    Get,
}

#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub pod: String,
    pub kind: CallKind,
    pub at: Instant,
}

/// How the fake API reacts to eviction submissions for one pod.
#[derive(Clone, Copy, Debug)]
pub enum EvictReaction {
    Accept,
    /// Fail the first N submissions, then accept.
    FailTimes(u32),
    AlwaysFail,
    NotFound,
}

#[derive(Default)]
struct Inner {
    pods: HashMap<String, Pod>,
    evict_reactions: HashMap<String, EvictReaction>,
    /// Pods that stay bound to their node even after an accepted eviction.
    sticky: HashSet<String>,
    /// On accepted eviction, rebind to this node instead of disappearing.
    rebind_to: HashMap<String, String>,
    failing_gets: HashSet<String>,
    failing_deletes: HashSet<String>,
    calls: Vec<RecordedCall>,
}

/// In-memory [`ClusterApi`] that records every call with a timestamp.
///
/// By default an accepted eviction removes the pod, so the next get
/// returns not-found.
pub struct FakeCluster {
    inner: Mutex<Inner>,
}

impl FakeCluster {
    pub fn new() -> FakeCluster {
        FakeCluster {
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn add_pod(&self, pod: &Pod) {
        let name = pod
            .metadata
            .name
            .clone()
            .expect("fake cluster pods need a name");
        self.inner.lock().unwrap().pods.insert(name, pod.clone());
    }

    pub fn set_evict_reaction(&self, pod: &str, reaction: EvictReaction) {
        self.inner
            .lock()
            .unwrap()
            .evict_reactions
            .insert(pod.to_string(), reaction);
    }

    pub fn make_sticky(&self, pod: &str) {
        self.inner.lock().unwrap().sticky.insert(pod.to_string());
    }

    pub fn rebind_on_evict(&self, pod: &str, node: &str) {
        self.inner
            .lock()
            .unwrap()
            .rebind_to
            .insert(pod.to_string(), node.to_string());
    }

    pub fn fail_gets(&self, pod: &str) {
        self.inner
            .lock()
            .unwrap()
            .failing_gets
            .insert(pod.to_string());
    }

    pub fn fail_deletes(&self, pod: &str) {
        self.inner
            .lock()
            .unwrap()
            .failing_deletes
            .insert(pod.to_string());
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn calls_for(&self, pod: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.pod == pod)
            .collect()
    }

    pub fn evictions_for(&self, pod: &str) -> Vec<RecordedCall> {
        self.calls_for(pod)
            .into_iter()
            .filter(|call| matches!(call.kind, CallKind::Evict { .. }))
            .collect()
    }

    /// Grace period of the first eviction submitted for the pod.
    pub fn submitted_grace_for(&self, pod: &str) -> Option<i64> {
        self.evictions_for(pod).first().map(|call| match call.kind {
            CallKind::Evict {
                grace_period_seconds,
            } => grace_period_seconds,
            _ => unreachable!(),
        })
    }

    fn record(inner: &mut Inner, pod: &PodRef, kind: CallKind) {
        inner.calls.push(RecordedCall {
            pod: pod.name.clone(),
            kind,
            at: Instant::now(),
        });
    }
}

fn api_error(code: u16, reason: &str) -> kube::Error {
    kube::Error::Api(ErrorResponse {
        status: "Failure".to_string(),
        message: format!("fake api error: {reason}"),
        reason: reason.to_string(),
        code,
    })
}

fn not_found() -> kube::Error {
    api_error(404, "NotFound")
}

fn internal_error() -> kube::Error {
    api_error(500, "InternalError")
}

#[async_trait]
impl ClusterApi for FakeCluster {
    async fn evict(&self, pod: &PodRef, grace_period_seconds: i64) -> kube::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        Self::record(
            &mut inner,
            pod,
            CallKind::Evict {
                grace_period_seconds,
            },
        );

        let reaction = inner
            .evict_reactions
            .get(&pod.name)
            .copied()
            .unwrap_or(EvictReaction::Accept);

        match reaction {
            EvictReaction::Accept => {}
            EvictReaction::FailTimes(0) => {}
            EvictReaction::FailTimes(remaining) => {
                inner
                    .evict_reactions
                    .insert(pod.name.clone(), EvictReaction::FailTimes(remaining - 1));
                return Err(internal_error());
            }
            EvictReaction::AlwaysFail => return Err(internal_error()),
            EvictReaction::NotFound => return Err(not_found()),
        }

        if inner.sticky.contains(&pod.name) {
            return Ok(());
        }

        if let Some(node) = inner.rebind_to.get(&pod.name).cloned() {
            if let Some(stored) = inner.pods.get_mut(&pod.name) {
                stored.spec.get_or_insert_with(Default::default).node_name = Some(node);
            }
            return Ok(());
        }

        inner.pods.remove(&pod.name);
        Ok(())
    }

    async fn delete_pod(&self, pod: &PodRef) -> kube::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        Self::record(&mut inner, pod, CallKind::Delete);

        if inner.failing_deletes.contains(&pod.name) {
            return Err(internal_error());
        }

        inner.pods.remove(&pod.name);
        inner.sticky.remove(&pod.name);
        Ok(())
    }

    async fn get_pod(&self, pod: &PodRef) -> kube::Result<Pod> {
        let mut inner = self.inner.lock().unwrap();
        Self::record(&mut inner, pod, CallKind::Get);

        if inner.failing_gets.contains(&pod.name) {
            return Err(internal_error());
        }

        inner.pods.get(&pod.name).cloned().ok_or_else(not_found)
    }
}
