use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

use crate::error::ValidationError;

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub tasks_validated_total: IntCounterVec,
    pub validation_violations_total: IntCounterVec,
    pub task_distance_km: HistogramVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let tasks_validated_total = IntCounterVec::new(
            Opts::new("tasks_validated_total", "Delivery task payloads validated, by outcome"),
            &["outcome"],
        )
        .expect("valid tasks_validated_total metric");

        let validation_violations_total = IntCounterVec::new(
            Opts::new("validation_violations_total", "Rejected constraints, by violation kind"),
            &["kind"],
        )
        .expect("valid validation_violations_total metric");

        let task_distance_km = HistogramVec::new(
            HistogramOpts::new("task_distance_km", "Pickup to dropoff distance of accepted tasks")
                .buckets(vec![0.5, 1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0, 500.0]),
            &["status"],
        )
        .expect("valid task_distance_km metric");

        registry
            .register(Box::new(tasks_validated_total.clone()))
            .expect("register tasks_validated_total");
        registry
            .register(Box::new(validation_violations_total.clone()))
            .expect("register validation_violations_total");
        registry
            .register(Box::new(task_distance_km.clone()))
            .expect("register task_distance_km");

        Self {
            registry,
            tasks_validated_total,
            validation_violations_total,
            task_distance_km,
        }
    }

    pub fn record_rejection(&self, err: &ValidationError) {
        self.tasks_validated_total.with_label_values(&["rejected"]).inc();
        for violation in &err.violations {
            self.validation_violations_total
                .with_label_values(&[violation.kind.as_str()])
                .inc();
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Metrics;
    use crate::error::{ValidationError, ViolationKind};

    #[test]
    fn rejections_are_counted_per_kind() {
        let metrics = Metrics::new();
        let err = ValidationError::single("weight_kg", ViolationKind::NotPositive, "must be greater than 0");

        metrics.record_rejection(&err);

        assert_eq!(metrics.tasks_validated_total.with_label_values(&["rejected"]).get(), 1);
        assert_eq!(
            metrics.validation_violations_total.with_label_values(&["not_positive"]).get(),
            1
        );
        assert!(metrics.encode().unwrap().contains("validation_violations_total"));
    }
}
