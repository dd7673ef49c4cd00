use opentelemetry::KeyValue;
use opentelemetry::metrics::{Counter, Meter};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EvictionOutcome {
    Succeeded,
    Failed,
}

impl EvictionOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            EvictionOutcome::Succeeded => "succeeded",
            EvictionOutcome::Failed => "failed",
        }
    }
}

/// Sink for eviction counters. One registration per full-eviction
/// confirmation; best-effort evictions are not counted.
pub trait EvictionMetrics: Send + Sync {
    fn register_eviction(&self, count: u64, outcome: EvictionOutcome);
}

/// OpenTelemetry-backed metrics sink.
pub struct DrainMetrics {
    evictions: Counter<u64>,
}

impl DrainMetrics {
    pub fn new(meter: Meter) -> DrainMetrics {
        let evictions = meter
            .u64_counter("scaledown_evictions")
            .with_description("Pod evictions performed during node scale-down")
            .init();

        DrainMetrics { evictions }
    }
}

impl EvictionMetrics for DrainMetrics {
    fn register_eviction(&self, count: u64, outcome: EvictionOutcome) {
        self.evictions
            .add(count, &[KeyValue::new("outcome", outcome.as_str())]);
    }
}

/// Discards every measurement.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopEvictionMetrics;

impl EvictionMetrics for NoopEvictionMetrics {
    fn register_eviction(&self, _count: u64, _outcome: EvictionOutcome) {}
}
