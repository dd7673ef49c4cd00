use k8s_openapi::api::core::v1::Pod;

use crate::try_some;

/// One row of the shutdown-grace table: pods with priority up to `priority`
/// get `shutdown_grace_period_seconds` to terminate. Mirrors the kubelet's
/// graceful node-shutdown configuration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ShutdownGracePeriodByPodPriority {
    pub priority: i32,
    pub shutdown_grace_period_seconds: i64,
}

/// Pods sharing one shutdown-grace band.
#[derive(Clone, Debug)]
pub(crate) struct EvictionGroup {
    pub rule: ShutdownGracePeriodByPodPriority,
    pub full_eviction_pods: Vec<Pod>,
    pub best_effort_eviction_pods: Vec<Pod>,
}

impl EvictionGroup {
    pub fn is_empty(&self) -> bool {
        self.full_eviction_pods.is_empty() && self.best_effort_eviction_pods.is_empty()
    }
}

/// Bucket pods into shutdown-grace bands, ascending by priority ceiling.
/// The table must already be sorted. An empty table yields a single band
/// covering every pod, with no grace cap. Pods keep their input order
/// within a band.
pub(crate) fn group_by_priority(
    table: &[ShutdownGracePeriodByPodPriority],
    full_eviction_pods: Vec<Pod>,
    best_effort_eviction_pods: Vec<Pod>,
) -> Vec<EvictionGroup> {
    let mut groups: Vec<EvictionGroup> = if table.is_empty() {
        vec![EvictionGroup {
            rule: ShutdownGracePeriodByPodPriority {
                priority: i32::MAX,
                shutdown_grace_period_seconds: 0,
            },
            full_eviction_pods: Vec::new(),
            best_effort_eviction_pods: Vec::new(),
        }]
    } else {
        table
            .iter()
            .map(|rule| EvictionGroup {
                rule: *rule,
                full_eviction_pods: Vec::new(),
                best_effort_eviction_pods: Vec::new(),
            })
            .collect()
    };

    for pod in full_eviction_pods {
        let index = group_index(&pod, &groups);
        groups[index].full_eviction_pods.push(pod);
    }

    for pod in best_effort_eviction_pods {
        let index = group_index(&pod, &groups);
        groups[index].best_effort_eviction_pods.push(pod);
    }

    groups
}

// First band whose ceiling covers the pod's priority; anything above the
// largest ceiling lands in the last band.
fn group_index(pod: &Pod, groups: &[EvictionGroup]) -> usize {
    let priority = pod_priority(pod);
    let index = groups.partition_point(|group| group.rule.priority < priority);
    index.min(groups.len() - 1)
}

pub(crate) fn pod_priority(pod: &Pod) -> i32 {
    try_some!(*pod.spec?.priority?).unwrap_or(0)
}
