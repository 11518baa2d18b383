//! Investigation observers.

use crate::core::{CollectorOutcome, CollectorSpec, InvestigationObserver, OutcomeStatus};
use crate::identifier::Identifier;
use crate::report::Report;
use tracing::{debug, info, warn};

/// Reports investigation progress as structured `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl InvestigationObserver for TracingObserver {
    fn on_dispatch(&self, identifier: &Identifier, spec: &CollectorSpec) {
        debug!(
            target_id = %identifier,
            collector = spec.name,
            timeout_ms = spec.timeout.as_millis() as u64,
            "Dispatching collector"
        );
    }

    fn on_outcome(&self, outcome: &CollectorOutcome) {
        let duration_ms = outcome.duration.as_millis() as u64;
        match &outcome.status {
            OutcomeStatus::Ok(payload) => info!(
                collector = %outcome.collector,
                findings = payload.finding_count(),
                duration_ms,
                "Collector finished"
            ),
            OutcomeStatus::Skipped(reason) => debug!(
                collector = %outcome.collector,
                reason = %reason,
                "Collector skipped"
            ),
            OutcomeStatus::TimedOut => warn!(
                collector = %outcome.collector,
                duration_ms,
                "Collector timed out"
            ),
            OutcomeStatus::Failed(reason) => warn!(
                collector = %outcome.collector,
                error = %reason,
                duration_ms,
                "Collector failed"
            ),
        }
    }

    fn on_report(&self, report: &Report) {
        let (ok, failed, skipped) = report.tally();
        info!(
            target_id = %report.identifier(),
            status = %report.overall_status(),
            ok,
            failed,
            skipped,
            "Investigation complete"
        );
    }
}
