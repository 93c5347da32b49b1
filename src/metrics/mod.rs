//! Metrics collection for observability

use prometheus::{
    Counter, CounterVec, Histogram, HistogramOpts, HistogramVec, Opts, Registry,
    register_counter_vec_with_registry, register_counter_with_registry,
    register_histogram_vec_with_registry, register_histogram_with_registry,
};
use std::sync::Arc;
use once_cell::sync::Lazy;

/// Global metrics registry
pub static METRICS: Lazy<Arc<Metrics>> = Lazy::new(|| {
    Arc::new(Metrics::new().expect("Failed to initialize metrics"))
});

/// Metrics collector
pub struct Metrics {
    registry: Registry,

    // Chat pipeline metrics
    pub chat_requests: CounterVec,
    pub chat_request_duration: Histogram,

    // Backend metrics
    pub backend_attempts: CounterVec,
    pub backend_attempt_duration: HistogramVec,

    // Composer metrics
    pub composer_routes: CounterVec,

    // Snapshot metrics
    pub snapshot_fallbacks: Counter,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let chat_requests = register_counter_vec_with_registry!(
            Opts::new("chat_requests_total", "Total chat requests by answering engine"),
            &["engine"],
            registry
        )?;

        let chat_request_duration = register_histogram_with_registry!(
            HistogramOpts::new(
                "chat_request_duration_seconds",
                "End-to-end chat request duration in seconds"
            ),
            registry
        )?;

        let backend_attempts = register_counter_vec_with_registry!(
            Opts::new("backend_attempts_total", "Total generation backend attempts"),
            &["backend", "outcome"],
            registry
        )?;

        let backend_attempt_duration = register_histogram_vec_with_registry!(
            "backend_attempt_duration_seconds",
            "Generation backend attempt duration in seconds",
            &["backend"],
            registry
        )?;

        let composer_routes = register_counter_vec_with_registry!(
            Opts::new("composer_routes_total", "Template composer dispatch routes taken"),
            &["route"],
            registry
        )?;

        let snapshot_fallbacks = register_counter_with_registry!(
            Opts::new(
                "snapshot_fallbacks_total",
                "Total zeroed snapshots substituted for failed metric reads"
            ),
            registry
        )?;

        Ok(Self {
            registry,
            chat_requests,
            chat_request_duration,
            backend_attempts,
            backend_attempt_duration,
            composer_routes,
            snapshot_fallbacks,
        })
    }

    /// Get the metrics registry for exporting
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record a completed chat request
    pub fn record_chat(&self, engine: &str, seconds: f64) {
        self.chat_requests.with_label_values(&[engine]).inc();
        self.chat_request_duration.observe(seconds);
    }

    /// Record one backend attempt
    pub fn record_backend_attempt(&self, backend: &str, outcome: &str, seconds: f64) {
        self.backend_attempts
            .with_label_values(&[backend, outcome])
            .inc();
        self.backend_attempt_duration
            .with_label_values(&[backend])
            .observe(seconds);
    }

    /// Record a composer dispatch route
    pub fn record_route(&self, route: &str) {
        self.composer_routes.with_label_values(&[route]).inc();
    }

    /// Record a snapshot fallback
    pub fn record_snapshot_fallback(&self) {
        self.snapshot_fallbacks.inc();
    }

    /// Export metrics in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        use prometheus::Encoder;

        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).unwrap_or_default();

        String::from_utf8(buffer).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_initialization() {
        let metrics = Metrics::new();
        assert!(metrics.is_ok());
    }

    #[test]
    fn test_record_chat_and_export() {
        let metrics = Metrics::new().unwrap();
        metrics.record_chat("template-fallback", 0.01);
        metrics.record_backend_attempt("local", "timeout", 3.0);
        metrics.record_route("greeting");

        let text = metrics.export_prometheus();
        assert!(text.contains("chat_requests_total"));
        assert!(text.contains("backend_attempts_total"));
        assert!(text.contains("composer_routes_total"));
    }

    #[test]
    fn test_snapshot_fallback_counter() {
        let metrics = Metrics::new().unwrap();
        metrics.record_snapshot_fallback();
        metrics.record_snapshot_fallback();
        assert_eq!(metrics.snapshot_fallbacks.get(), 2.0);
    }
}
