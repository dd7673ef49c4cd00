use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::ResourceExt;
use kube::runtime::events::EventType;

use crate::context::EvictionObserver;
use crate::metrics::{EvictionMetrics, EvictionOutcome};
use crate::report::EventSink;

#[derive(Clone, Debug)]
pub struct RecordedEvent {
    pub pod: String,
    pub warning: bool,
    pub reason: String,
    pub note: String,
}

#[derive(Default)]
pub struct EventLog {
    events: Mutex<Vec<RecordedEvent>>,
}

impl EventLog {
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn warnings_for(&self, pod: &str) -> Vec<RecordedEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.warning && event.pod == pod)
            .collect()
    }
}

#[async_trait]
impl EventSink for EventLog {
    async fn publish(&self, pod: &Pod, type_: EventType, reason: &str, note: &str) {
        self.events.lock().unwrap().push(RecordedEvent {
            pod: pod.name_any(),
            warning: matches!(type_, EventType::Warning),
            reason: reason.to_string(),
            note: note.to_string(),
        });
    }
}

#[derive(Default)]
pub struct MetricsLog {
    succeeded: AtomicU64,
    failed: AtomicU64,
}

impl MetricsLog {
    pub fn succeeded(&self) -> u64 {
        self.succeeded.load(Ordering::SeqCst)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::SeqCst)
    }
}

impl EvictionMetrics for MetricsLog {
    fn register_eviction(&self, count: u64, outcome: EvictionOutcome) {
        let counter = match outcome {
            EvictionOutcome::Succeeded => &self.succeeded,
            EvictionOutcome::Failed => &self.failed,
        };
        counter.fetch_add(count, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct ObserverLog {
    evicted: Mutex<Vec<String>>,
}

impl ObserverLog {
    pub fn evicted(&self) -> Vec<String> {
        self.evicted.lock().unwrap().clone()
    }
}

impl EvictionObserver for ObserverLog {
    fn on_evicted(&self, pod: &Pod) {
        self.evicted.lock().unwrap().push(pod.name_any());
    }
}
