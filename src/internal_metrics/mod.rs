//! # Internal Metrics Module
//!
//! - **`Metrics`**: a cloneable handle the orchestrator records collector
//!   and investigation metrics through.
//! - **`install_prometheus`**: installs a Prometheus recorder as the global
//!   recorder and returns the handle used to render the text exposition at
//!   the end of a run. There is no scrape endpoint; the process is short-lived.
//!
//! Without an installed recorder every call on `Metrics` is a no-op.

use crate::core::CollectorOutcome;
use crate::report::OverallStatus;
use anyhow::{anyhow, Result};
use metrics::Unit;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

/// The public API for the metrics system.
#[derive(Clone, Default)]
pub struct Metrics;

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics").finish_non_exhaustive()
    }
}

impl Metrics {
    /// Creates a new `Metrics` handle and registers descriptions for all
    /// metrics with the global recorder.
    pub fn new() -> Self {
        metrics::describe_counter!("collector_runs_total", Unit::Count, "Total number of collector runs, labeled by collector and outcome status.");
        metrics::describe_histogram!("collector_duration_seconds", Unit::Seconds, "Wall-clock time of each collector run, including time spent waiting for a slot.");
        metrics::describe_counter!("investigations_total", Unit::Count, "Total number of investigations, labeled by overall status.");
        metrics::describe_histogram!("investigation_duration_seconds", Unit::Seconds, "Wall-clock time of each investigation.");
        Self
    }

    pub fn record_outcome(&self, outcome: &CollectorOutcome) {
        metrics::counter!(
            "collector_runs_total",
            "collector" => outcome.collector.clone(),
            "status" => outcome.status.label()
        )
        .increment(1);
        metrics::histogram!("collector_duration_seconds", "collector" => outcome.collector.clone())
            .record(outcome.duration.as_secs_f64());
    }

    pub fn record_investigation(&self, status: OverallStatus, elapsed: std::time::Duration) {
        metrics::counter!("investigations_total", "status" => status.as_str()).increment(1);
        metrics::histogram!("investigation_duration_seconds").record(elapsed.as_secs_f64());
    }
}

/// Installs a Prometheus recorder as the process-wide metrics recorder.
///
/// Fails if a recorder is already installed.
pub fn install_prometheus() -> Result<PrometheusHandle> {
    let recorder = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Suffix("duration_seconds".to_string()),
            &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0],
        )?
        .build_recorder();
    let handle = recorder.handle();
    metrics::set_global_recorder(recorder)
        .map_err(|e| anyhow!("failed to install metrics recorder: {}", e))?;
    Ok(handle)
}
