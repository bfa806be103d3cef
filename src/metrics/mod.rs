//! Prometheus metrics for batch evaluation.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

use crate::models::signal::{AggregationResult, AggregationStatus};

pub struct Metrics {
    registry: Registry,
    pub evaluations_total: IntCounterVec,
    pub validation_failures_total: IntCounter,
    pub advisory_outcomes_total: IntCounterVec,
    pub evaluation_duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let evaluations_total = IntCounterVec::new(
            Opts::new("evaluations_total", "Aggregation results by status"),
            &["status"],
        )?;
        let validation_failures_total = IntCounter::new(
            "validation_failures_total",
            "Evaluations rejected for malformed predictions",
        )?;
        let advisory_outcomes_total = IntCounterVec::new(
            Opts::new("advisory_outcomes_total", "Advisory step outcomes"),
            &["outcome"],
        )?;
        let evaluation_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "evaluation_duration_seconds",
                "Wall time of one asset evaluation",
            )
            .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 2.5]),
        )?;

        registry.register(Box::new(evaluations_total.clone()))?;
        registry.register(Box::new(validation_failures_total.clone()))?;
        registry.register(Box::new(advisory_outcomes_total.clone()))?;
        registry.register(Box::new(evaluation_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            evaluations_total,
            validation_failures_total,
            advisory_outcomes_total,
            evaluation_duration_seconds,
        })
    }

    pub fn record_result(&self, result: &AggregationResult) {
        let status = match result.status {
            AggregationStatus::Resolved => "resolved",
            AggregationStatus::NoSignal => "no_signal",
        };
        self.evaluations_total.with_label_values(&[status]).inc();
        self.advisory_outcomes_total
            .with_label_values(&[result.advisory.label()])
            .inc();
    }

    /// Render all metrics in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
