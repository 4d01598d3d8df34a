//! The `Metrics` capability. Prometheus exporters and the like are an
//! external collaborator; the core only needs somewhere to record
//! counters/timings, so this trait stands in for whatever backend the
//! caller wires up (a Prometheus registry, a no-op, a test recorder).

pub trait Metrics: Send + Sync {
    fn incr_counter(&self, name: &str, value: u64);
    fn observe_duration_ms(&self, name: &str, ms: f64);
    fn set_gauge(&self, name: &str, value: f64);
}

/// A metrics sink that discards everything. The default when no exporter
/// is wired up.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl Metrics for NoopMetrics {
    fn incr_counter(&self, _name: &str, _value: u64) {}
    fn observe_duration_ms(&self, _name: &str, _ms: f64) {}
    fn set_gauge(&self, _name: &str, _value: f64) {}
}
