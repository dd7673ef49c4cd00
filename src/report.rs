use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::Resource;
use kube::runtime::events::{Event, EventType, Recorder};

use crate::consts::EVENT_ACTION_DRAINING;

/// Sink for the pod-scoped events a drain emits.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn publish(&self, pod: &Pod, type_: EventType, reason: &str, note: &str);
}

/// Publishes drain events through the API server.
pub struct KubeEventSink {
    recorder: Recorder,
}

impl KubeEventSink {
    pub fn new(recorder: Recorder) -> KubeEventSink {
        KubeEventSink { recorder }
    }
}

#[async_trait]
impl EventSink for KubeEventSink {
    async fn publish(&self, pod: &Pod, type_: EventType, reason: &str, note: &str) {
        let event = Event {
            type_,
            action: EVENT_ACTION_DRAINING.to_string(),
            reason: reason.to_string(),
            note: Some(truncate_note(note)),
            secondary: None,
        };

        // ignore the error of diagnostic events
        let _ = self.recorder.publish(&event, &pod.object_ref(&())).await;
    }
}

// max limit of the note is 1KB
fn truncate_note(note: &str) -> String {
    const MAX_NOTE_LEN: usize = 1024;

    if note.len() <= MAX_NOTE_LEN {
        return note.to_string();
    }

    let mut boundary = MAX_NOTE_LEN - "...".len();
    while !note.is_char_boundary(boundary) {
        boundary -= 1;
    }

    format!("{}...", &note[..boundary])
}
