//! The investigation orchestrator.
//!
//! Fans one identifier out to every applicable collector, bounds each run by
//! its own timeout and the whole investigation by a total budget, and turns
//! whatever comes back (or doesn't) into an ordered list of outcomes.

use crate::core::{
    Collector, CollectorError, CollectorOutcome, InvestigationObserver, OrchestrationError,
    OutcomeStatus,
};
use crate::identifier::{Identifier, ValidationError};
use crate::internal_metrics::Metrics;
use crate::observer::TracingObserver;
use crate::report::{aggregate, Report};
use crate::routing::RoutingTable;
use chrono::Utc;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, watch, Semaphore};
use tokio::task::JoinHandle;
use tokio::time::{timeout, timeout_at, Instant};
use tracing::{debug, warn};

pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(250);
pub const DEFAULT_MAX_CONCURRENCY: usize = 5;

/// Anything that stops an investigation from producing a report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvestigationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Orchestration(#[from] OrchestrationError),
}

/// Runs investigations. Holds no per-investigation state, so one instance
/// can serve any number of concurrent investigations.
#[derive(Clone)]
pub struct Orchestrator {
    grace_period: Duration,
    max_concurrency: usize,
    observer: Arc<dyn InvestigationObserver>,
    metrics: Metrics,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self {
            grace_period: DEFAULT_GRACE_PERIOD,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            observer: Arc::new(TracingObserver),
            metrics: Metrics::default(),
        }
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("grace_period", &self.grace_period)
            .field("max_concurrency", &self.max_concurrency)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// How long to wait, after the budget expires, for cancelled collectors
    /// to wind down before their tasks are aborted.
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// Maximum number of collectors executing at once.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn InvestigationObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Normalizes `raw` and investigates it.
    pub async fn investigate_raw(
        &self,
        raw: &str,
        table: &RoutingTable,
        budget: Duration,
    ) -> Result<Report, InvestigationError> {
        let identifier = crate::identifier::normalize(raw)?;
        Ok(self.investigate(identifier, table, budget).await?)
    }

    /// Runs every collector in `table` that applies to `identifier`.
    ///
    /// Returns within `budget` plus the grace period. The report holds one
    /// outcome per selected collector, in registration order; collectors
    /// still running when the budget expires are reported as timed out.
    pub async fn investigate(
        &self,
        identifier: Identifier,
        table: &RoutingTable,
        budget: Duration,
    ) -> Result<Report, OrchestrationError> {
        if budget.is_zero() {
            return Err(OrchestrationError::InvalidBudget(budget));
        }
        if self.max_concurrency == 0 {
            return Err(OrchestrationError::InvalidConcurrency);
        }

        let started_at = Utc::now();
        let start = Instant::now();
        let deadline = start + budget;
        let collectors = table.select(identifier.kind());
        debug!(
            target_id = %identifier,
            collectors = collectors.len(),
            budget_ms = budget.as_millis() as u64,
            "Starting investigation"
        );

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let (tx, mut rx) = mpsc::channel(collectors.len().max(1));

        let mut handles: Vec<JoinHandle<()>> = Vec::with_capacity(collectors.len());
        for (slot, collector) in collectors.iter().enumerate() {
            self.observer.on_dispatch(&identifier, collector.spec());
            let run = run_collector(
                collector.clone(),
                identifier.clone(),
                semaphore.clone(),
                cancel_rx.clone(),
                deadline,
            );
            let tx = tx.clone();
            handles.push(tokio::spawn(async move {
                let outcome = run.await;
                // The receiver is gone once the investigation has been
                // finalized; a late outcome is dropped.
                let _ = tx.send((slot, outcome)).await;
            }));
        }
        drop(tx);

        let mut slots: Vec<Option<CollectorOutcome>> = vec![None; collectors.len()];
        let mut budget_expired = false;
        loop {
            match timeout_at(deadline, rx.recv()).await {
                Ok(Some((slot, outcome))) => {
                    self.record(&outcome);
                    slots[slot] = Some(outcome);
                }
                Ok(None) => break,
                Err(_) => {
                    budget_expired = true;
                    break;
                }
            }
        }

        if budget_expired {
            let outstanding = slots.iter().filter(|s| s.is_none()).count();
            warn!(
                target_id = %identifier,
                outstanding,
                "Investigation budget exhausted, cancelling outstanding collectors"
            );
            let _ = cancel_tx.send(true);

            let grace_deadline = Instant::now() + self.grace_period;
            while let Ok(Some((slot, _late))) = timeout_at(grace_deadline, rx.recv()).await {
                debug!(
                    collector = collectors[slot].name(),
                    "Discarding outcome reported after the budget expired"
                );
            }
            for handle in &handles {
                handle.abort();
            }
        }
        drop(rx);

        let elapsed = start.elapsed();
        let outcomes: Vec<CollectorOutcome> = slots
            .into_iter()
            .zip(collectors.iter())
            .map(|(slot, collector)| {
                slot.unwrap_or_else(|| {
                    let status = if budget_expired {
                        OutcomeStatus::TimedOut
                    } else {
                        OutcomeStatus::Failed(
                            "collector exited without reporting an outcome".to_string(),
                        )
                    };
                    let outcome =
                        CollectorOutcome::new(identifier.clone(), collector.name(), status, elapsed);
                    self.record(&outcome);
                    outcome
                })
            })
            .collect();

        let report = aggregate(identifier, outcomes, started_at, Utc::now());
        self.metrics
            .record_investigation(report.overall_status(), start.elapsed());
        self.observer.on_report(&report);
        Ok(report)
    }

    fn record(&self, outcome: &CollectorOutcome) {
        self.metrics.record_outcome(outcome);
        self.observer.on_outcome(outcome);
    }
}

/// Investigates `identifier` with default orchestrator settings.
pub async fn investigate(
    identifier: Identifier,
    table: &RoutingTable,
    budget: Duration,
) -> Result<Report, OrchestrationError> {
    Orchestrator::default()
        .investigate(identifier, table, budget)
        .await
}

/// Runs one collector to an outcome. Never fails: every error, timeout and
/// panic becomes a status.
async fn run_collector(
    collector: Arc<dyn Collector>,
    identifier: Identifier,
    semaphore: Arc<Semaphore>,
    cancel: watch::Receiver<bool>,
    deadline: Instant,
) -> CollectorOutcome {
    let dispatched = Instant::now();
    let finish = |status| {
        CollectorOutcome::new(
            identifier.clone(),
            collector.name(),
            status,
            dispatched.elapsed(),
        )
    };

    // Waiting for a slot counts against the budget.
    let _permit = match timeout_at(deadline, semaphore.clone().acquire_owned()).await {
        Ok(Ok(permit)) => permit,
        Ok(Err(_)) => {
            return finish(OutcomeStatus::Failed(
                "concurrency limiter closed".to_string(),
            ))
        }
        Err(_) => return finish(OutcomeStatus::TimedOut),
    };

    let remaining = deadline.saturating_duration_since(Instant::now());
    let limit = collector.timeout().min(remaining);
    let run = AssertUnwindSafe(collector.run(&identifier, cancel)).catch_unwind();

    let status = match timeout(limit, run).await {
        Err(_) => OutcomeStatus::TimedOut,
        Ok(Err(_)) => OutcomeStatus::Failed("collector panicked".to_string()),
        Ok(Ok(Ok(payload))) => {
            let declared = collector.spec().schema;
            if payload.schema() == declared {
                OutcomeStatus::Ok(payload)
            } else {
                OutcomeStatus::Failed(format!(
                    "payload schema mismatch: declared {}, produced {}",
                    declared,
                    payload.schema()
                ))
            }
        }
        Ok(Ok(Err(CollectorError::Cancelled))) => OutcomeStatus::TimedOut,
        Ok(Ok(Err(CollectorError::NotApplicable))) => OutcomeStatus::Skipped(format!(
            "not applicable to {} targets",
            identifier.kind()
        )),
        Ok(Ok(Err(CollectorError::UpstreamFailure(reason)))) => OutcomeStatus::Failed(reason),
    };
    finish(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CollectorsConfig;
    use crate::core::CollectorSpec;
    use crate::fixtures::FixtureSource;
    use crate::identifier::{normalize, IdentifierKind};
    use crate::payload::{Payload, PayloadSchema, PastePayload};
    use crate::report::OverallStatus;
    use crate::types::CancelSignal;
    use async_trait::async_trait;

    struct WrongSchema(CollectorSpec);

    #[async_trait]
    impl Collector for WrongSchema {
        fn spec(&self) -> &CollectorSpec {
            &self.0
        }

        async fn run(
            &self,
            _identifier: &Identifier,
            _cancel: CancelSignal,
        ) -> Result<Payload, CollectorError> {
            Ok(Payload::Paste(PastePayload { pastes: vec![] }))
        }
    }

    #[tokio::test]
    async fn test_zero_budget_is_rejected() {
        let table = RoutingTable::new(vec![]);
        let id = normalize("example.com").unwrap();
        let err = investigate(id, &table, Duration::ZERO).await.unwrap_err();
        assert_eq!(err, OrchestrationError::InvalidBudget(Duration::ZERO));
    }

    #[tokio::test]
    async fn test_zero_concurrency_is_rejected() {
        let table = RoutingTable::new(vec![]);
        let id = normalize("example.com").unwrap();
        let err = Orchestrator::new()
            .with_max_concurrency(0)
            .investigate(id, &table, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert_eq!(err, OrchestrationError::InvalidConcurrency);
    }

    #[tokio::test]
    async fn test_schema_mismatch_is_a_failure() {
        let spec = CollectorSpec {
            name: "liar",
            description: "claims dns, returns pastes",
            applies_to: &[IdentifierKind::Domain],
            timeout: Duration::from_secs(1),
            schema: PayloadSchema::Dns,
        };
        let table = RoutingTable::new(vec![Arc::new(WrongSchema(spec))]);
        let id = normalize("example.com").unwrap();
        let report = investigate(id, &table, Duration::from_secs(1)).await.unwrap();

        assert_eq!(report.overall_status(), OverallStatus::TotalFailure);
        assert!(matches!(
            &report.outcomes()[0].status,
            OutcomeStatus::Failed(reason) if reason.contains("schema mismatch")
        ));
    }

    #[tokio::test]
    async fn test_invalid_target_is_a_validation_error() {
        let table = RoutingTable::new(vec![]);
        let err = Orchestrator::new()
            .investigate_raw("   ", &table, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert_eq!(err, InvestigationError::Validation(ValidationError::EmptyInput));
    }

    #[tokio::test]
    async fn test_domain_investigation_with_fixtures() {
        let table = RoutingTable::standard(&CollectorsConfig::default(), Arc::new(FixtureSource));
        let id = normalize("example.com").unwrap();
        let report = investigate(id, &table, Duration::from_secs(5)).await.unwrap();

        let names: Vec<&str> = report.outcomes().iter().map(|o| o.collector.as_str()).collect();
        assert_eq!(names, vec!["domain_metadata", "dns", "whois"]);
        assert_eq!(report.overall_status(), OverallStatus::Complete);
    }
}
