use std::time::Duration;

use k8s_openapi::api::core::v1::Pod;
use kube::ResourceExt;
use kube::runtime::events::EventType;
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep};
use tracing::{debug, error, info, warn};

use crate::config::DrainConfig;
use crate::consts::{
    DEFAULT_TERMINATION_GRACE_PERIOD_SECONDS, EVENT_REASON_SCALE_DOWN,
    EVENT_REASON_SCALE_DOWN_FAILED,
};
use crate::context::DrainContext;
use crate::error_codes::{is_404_not_found_error, is_transient_error};
use crate::error_types::{DrainError, DrainFailure, PodEvictionError};
use crate::metrics::EvictionOutcome;
use crate::node_info::{NodeInfo, NodeRef, PodRef};
use crate::priority::{ShutdownGracePeriodByPodPriority, group_by_priority};
use crate::selector::pods_to_evict;
use crate::status::{EvictionResults, PodEvictionResult};
use crate::try_some;

const DISAPPEARANCE_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Removes every workload from a node selected for scale-down, walking
/// shutdown-grace bands in ascending pod priority.
#[derive(Clone)]
pub struct Evictor {
    eviction_retry_interval: Duration,
    pod_eviction_headroom: Duration,
    shutdown_grace_period_by_pod_priority: Vec<ShutdownGracePeriodByPodPriority>,
    full_ds_eviction: bool,
}

impl Evictor {
    pub fn new(config: DrainConfig) -> Evictor {
        let mut table = config.shutdown_grace_period_by_pod_priority;
        table.sort_by_key(|rule| rule.priority);

        Evictor {
            eviction_retry_interval: config.eviction_retry_interval,
            pod_eviction_headroom: config.pod_eviction_headroom,
            shutdown_grace_period_by_pod_priority: table,
            full_ds_eviction: config.full_ds_eviction,
        }
    }

    /// Evict every tenant pod from the node. Daemon-set pods are evicted
    /// best-effort unless `full_ds_eviction` is configured.
    ///
    /// On failure, the error carries the per-pod results accumulated so
    /// far; on success every full-eviction pod has a success entry.
    pub async fn drain_node(
        &self,
        ctx: &DrainContext,
        node_info: &NodeInfo,
    ) -> Result<EvictionResults, DrainError> {
        self.drain(ctx, node_info, false).await
    }

    /// Same as [`Evictor::drain_node`], but forcefully deletes pods whose
    /// eviction fails within the retry budget.
    pub async fn drain_node_force(
        &self,
        ctx: &DrainContext,
        node_info: &NodeInfo,
    ) -> Result<EvictionResults, DrainError> {
        self.drain(ctx, node_info, true).await
    }

    async fn drain(
        &self,
        ctx: &DrainContext,
        node_info: &NodeInfo,
        force: bool,
    ) -> Result<EvictionResults, DrainError> {
        let node = NodeRef::from_node(node_info.node());
        let (ds_pods, pods) = pods_to_evict(node_info, ctx.daemon_set_eviction_for_occupied_nodes);

        if self.full_ds_eviction {
            let mut full_eviction_pods = pods;
            full_eviction_pods.extend(ds_pods);
            self.drain_node_with_pods(ctx, &node, full_eviction_pods, Vec::new(), force)
                .await
        } else {
            self.drain_node_with_pods(ctx, &node, pods, ds_pods, force)
                .await
        }
    }

    /// Best-effort eviction of the node's daemon-set pods only. Does not
    /// wait for the pods to actually disappear.
    pub async fn evict_daemon_set_pods(
        &self,
        ctx: &DrainContext,
        node_info: &NodeInfo,
    ) -> Result<EvictionResults, DrainError> {
        let node = NodeRef::from_node(node_info.node());
        let (ds_pods, _) = pods_to_evict(node_info, ctx.daemon_set_eviction_for_empty_nodes);

        // force applies only to full eviction pods
        self.drain_node_with_pods(ctx, &node, Vec::new(), ds_pods, false)
            .await
    }

    async fn drain_node_with_pods(
        &self,
        ctx: &DrainContext,
        node: &NodeRef,
        full_eviction_pods: Vec<Pod>,
        best_effort_eviction_pods: Vec<Pod>,
        force: bool,
    ) -> Result<EvictionResults, DrainError> {
        let mut results = EvictionResults::new();

        let groups = group_by_priority(
            &self.shutdown_grace_period_by_pod_priority,
            full_eviction_pods,
            best_effort_eviction_pods,
        );

        // Seed every full-eviction pod as "not attempted". Entries are
        // overwritten as groups are dispatched, so an abort mid-walk still
        // leaves a total result map.
        for group in &groups {
            for pod in &group.full_eviction_pods {
                let pod_ref = PodRef::from_pod(pod);
                results.insert(
                    pod_ref.name.clone(),
                    PodEvictionResult {
                        timed_out: false,
                        error: Some(PodEvictionError::NotAttempted {
                            pod: pod_ref.clone(),
                        }),
                        pod: pod_ref,
                    },
                );
            }
        }

        for group in &groups {
            // Nothing in this band; do not burn its grace window.
            if group.is_empty() {
                continue;
            }

            if let Err(failure) = self
                .initiate_eviction(
                    ctx,
                    node,
                    &group.full_eviction_pods,
                    &group.best_effort_eviction_pods,
                    &mut results,
                    group.rule.shutdown_grace_period_seconds,
                    force,
                )
                .await
            {
                return Err(DrainError { failure, results });
            }

            if let Err(failure) = self
                .wait_pods_to_disappear(
                    ctx,
                    node,
                    &group.full_eviction_pods,
                    &mut results,
                    group.rule.shutdown_grace_period_seconds,
                )
                .await
            {
                return Err(DrainError { failure, results });
            }
        }

        info!(node = %node, "all pods removed");
        Ok(results)
    }

    async fn initiate_eviction(
        &self,
        ctx: &DrainContext,
        node: &NodeRef,
        full_eviction_pods: &[Pod],
        best_effort_eviction_pods: &[Pod],
        results: &mut EvictionResults,
        max_termination: i64,
        force: bool,
    ) -> Result<(), DrainFailure> {
        let retry_until = Instant::now() + ctx.max_pod_eviction_time;

        // Buffers hold every confirmation, so no eviction task ever blocks
        // on publishing its result.
        let (full_tx, mut full_rx) = mpsc::channel(full_eviction_pods.len().max(1));
        let (best_effort_tx, mut best_effort_rx) =
            mpsc::channel(best_effort_eviction_pods.len().max(1));

        for pod in full_eviction_pods {
            let pod_ref = PodRef::from_pod(pod);
            // Pending dispatch counts as a timeout until the worker reports
            // back.
            results.insert(
                pod_ref.name.clone(),
                PodEvictionResult {
                    pod: pod_ref,
                    timed_out: true,
                    error: None,
                },
            );

            let evictor = self.clone();
            let ctx = ctx.clone();
            let pod = pod.clone();
            let tx = full_tx.clone();
            tokio::spawn(async move {
                let result = evictor
                    .evict_pod(&ctx, &pod, retry_until, max_termination, true, force)
                    .await;
                _ = tx.send(result).await;
            });
        }

        for pod in best_effort_eviction_pods {
            let evictor = self.clone();
            let ctx = ctx.clone();
            let pod = pod.clone();
            let tx = best_effort_tx.clone();
            tokio::spawn(async move {
                // force applies only to full eviction pods
                let result = evictor
                    .evict_pod(&ctx, &pod, retry_until, max_termination, false, false)
                    .await;
                _ = tx.send(result).await;
            });
        }

        drop(full_tx);
        drop(best_effort_tx);

        let mut pending = full_eviction_pods.len() + best_effort_eviction_pods.len();
        while pending > 0 {
            select! {
                Some(result) = full_rx.recv() => {
                    let outcome = if result.succeeded() {
                        EvictionOutcome::Succeeded
                    } else {
                        EvictionOutcome::Failed
                    };
                    ctx.metrics.register_eviction(1, outcome);
                    results.insert(result.pod.name.clone(), result);
                    pending -= 1;
                }
                Some(_) = best_effort_rx.recv() => {
                    // best-effort outcomes are not reported back
                    pending -= 1;
                }
            }
        }

        let eviction_errors: Vec<PodEvictionError> = full_eviction_pods
            .iter()
            .filter_map(|pod| results.get(&pod.name_any()))
            .filter(|result| !result.succeeded())
            .filter_map(|result| result.error.clone())
            .collect();

        if !eviction_errors.is_empty() {
            return Err(DrainFailure::EvictionsFailed {
                node: node.clone(),
                errors: eviction_errors,
            });
        }

        Ok(())
    }

    async fn evict_pod(
        &self,
        ctx: &DrainContext,
        pod: &Pod,
        retry_until: Instant,
        max_termination: i64,
        full_eviction: bool,
        force: bool,
    ) -> PodEvictionResult {
        let pod_ref = PodRef::from_pod(pod);

        ctx.events
            .publish(
                pod,
                EventType::Normal,
                EVENT_REASON_SCALE_DOWN,
                "deleting pod for node scale down",
            )
            .await;

        let mut termination = try_some!(*pod.spec?.termination_grace_period_seconds?)
            .unwrap_or(DEFAULT_TERMINATION_GRACE_PERIOD_SECONDS);
        // A zero band grace means the band does not cap the pod's own value.
        if max_termination > 0 && termination > max_termination {
            termination = max_termination;
        }

        let mut last_error: Option<String> = None;
        let mut first = true;
        let cancelled = loop {
            if !first {
                select! {
                    _ = sleep(self.eviction_retry_interval) => {}
                    _ = ctx.shutdown.wait_shutdown_triggered() => break true,
                }
                if Instant::now() >= retry_until {
                    break false;
                }
            }
            first = false;

            let attempt = select! {
                result = ctx.cluster.evict(&pod_ref, termination) => result,
                _ = ctx.shutdown.wait_shutdown_triggered() => break true,
            };

            match attempt {
                Ok(()) => return self.notify_evicted(ctx, pod, &pod_ref),
                Err(err) if is_404_not_found_error(&err) => {
                    // the pod is gone anyway, which is what we wanted
                    return self.notify_evicted(ctx, pod, &pod_ref);
                }
                Err(err) => {
                    if is_transient_error(&err) {
                        debug!(pod = %pod_ref, %err, "eviction attempt failed");
                    } else {
                        warn!(pod = %pod_ref, %err, "eviction attempt failed");
                    }
                    last_error = Some(err.to_string());
                }
            }
        };

        let last_error = last_error.unwrap_or_else(|| String::from("eviction was interrupted"));
        error!(pod = %pod_ref, %last_error, "failed to evict pod");

        if force && !cancelled {
            info!(pod = %pod_ref, "starting force deletion of pod");

            let deleted = select! {
                result = ctx.cluster.delete_pod(&pod_ref) => {
                    result.map_err(|err| err.to_string())
                }
                _ = ctx.shutdown.wait_shutdown_triggered() => {
                    Err(String::from("force deletion was interrupted"))
                }
            };

            match deleted {
                Ok(()) => return self.notify_evicted(ctx, pod, &pod_ref),
                Err(reason) => {
                    error!(pod = %pod_ref, %reason, "failed to forcefully delete pod");
                    ctx.events
                        .publish(
                            pod,
                            EventType::Warning,
                            EVENT_REASON_SCALE_DOWN_FAILED,
                            "failed to forcefully delete pod for ScaleDown",
                        )
                        .await;

                    return PodEvictionResult {
                        pod: pod_ref.clone(),
                        timed_out: false,
                        error: Some(PodEvictionError::ForceDeleteFailed {
                            pod: pod_ref,
                            reason,
                        }),
                    };
                }
            }
        }

        if full_eviction {
            ctx.events
                .publish(
                    pod,
                    EventType::Warning,
                    EVENT_REASON_SCALE_DOWN_FAILED,
                    "failed to delete pod for ScaleDown",
                )
                .await;
        }

        PodEvictionResult {
            pod: pod_ref.clone(),
            timed_out: true,
            error: Some(PodEvictionError::EvictionTimedOut {
                pod: pod_ref,
                last_error,
            }),
        }
    }

    fn notify_evicted(&self, ctx: &DrainContext, pod: &Pod, pod_ref: &PodRef) -> PodEvictionResult {
        if let Some(observer) = &ctx.eviction_observer {
            observer.on_evicted(pod);
        }

        PodEvictionResult {
            pod: pod_ref.clone(),
            timed_out: false,
            error: None,
        }
    }

    /// Eviction acceptance only means a termination was started. Poll until
    /// every pod has actually left the node, bounded by the band's grace
    /// plus headroom.
    async fn wait_pods_to_disappear(
        &self,
        ctx: &DrainContext,
        node: &NodeRef,
        pods: &[Pod],
        results: &mut EvictionResults,
        max_termination: i64,
    ) -> Result<(), DrainFailure> {
        let deadline =
            Duration::from_secs(max_termination.max(0) as u64) + self.pod_eviction_headroom;

        let start = Instant::now();
        'poll: while start.elapsed() < deadline {
            let mut all_gone = true;
            for pod in pods {
                let pod_ref = PodRef::from_pod(pod);
                match self.is_pod_gone(ctx, node, &pod_ref).await {
                    Ok(true) => {}
                    Ok(false) => {
                        debug!(pod = %pod_ref, "not deleted yet");
                        all_gone = false;
                        break;
                    }
                    Err(err) => {
                        error!(pod = %pod_ref, %err, "failed to check pod");
                        all_gone = false;
                        break;
                    }
                }
            }

            if all_gone {
                return Ok(());
            }

            select! {
                _ = sleep(DISAPPEARANCE_POLL_INTERVAL) => {}
                _ = ctx.shutdown.wait_shutdown_triggered() => break 'poll,
            }
        }

        for pod in pods {
            let pod_ref = PodRef::from_pod(pod);
            let result = match self.is_pod_gone(ctx, node, &pod_ref).await {
                // late success: the pod left after the deadline check
                Ok(true) => PodEvictionResult {
                    pod: pod_ref,
                    timed_out: false,
                    error: None,
                },
                Ok(false) => PodEvictionResult {
                    pod: pod_ref,
                    timed_out: true,
                    error: None,
                },
                Err(err) => PodEvictionResult {
                    timed_out: true,
                    error: Some(PodEvictionError::StatusCheckFailed {
                        pod: pod_ref.clone(),
                        reason: err.to_string(),
                    }),
                    pod: pod_ref,
                },
            };
            results.insert(result.pod.name.clone(), result);
        }

        Err(DrainFailure::PodsRemaining { node: node.clone() })
    }

    /// A pod counts as gone when the API no longer has it, or when it has
    /// been rebound to a different node.
    async fn is_pod_gone(
        &self,
        ctx: &DrainContext,
        node: &NodeRef,
        pod_ref: &PodRef,
    ) -> kube::Result<bool> {
        let returned = select! {
            result = ctx.cluster.get_pod(pod_ref) => result,
            _ = ctx.shutdown.wait_shutdown_triggered() => return Ok(false),
        };

        match returned {
            Ok(pod) => {
                let bound_node = try_some!(pod.spec?.node_name?).map(String::as_str);
                Ok(bound_node != Some(node.name.as_str()))
            }
            Err(err) if is_404_not_found_error(&err) => Ok(true),
            Err(err) => Err(err),
        }
    }
}
