//! Core domain types and service traits for Footprint
//!
//! This module defines the fundamental data structures and trait contracts
//! that govern how collectors, the orchestrator and the outputs interact.

use crate::identifier::{Identifier, IdentifierKind};
use crate::payload::{Payload, PayloadSchema};
use crate::report::Report;
use crate::types::CancelSignal;
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Static descriptor of a collector, fixed at process start.
///
/// The ordered list of specs registered in a [`crate::routing::RoutingTable`]
/// defines which collectors run for an identifier type and in which order
/// their outcomes appear in a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorSpec {
    /// Unique collector name (e.g., "breach", "dns").
    pub name: &'static str,
    /// Short human-readable description, used by the module listing.
    pub description: &'static str,
    /// Identifier types this collector can investigate.
    pub applies_to: &'static [IdentifierKind],
    /// Declared per-collector timeout.
    pub timeout: Duration,
    /// Schema tag of the payload this collector produces.
    pub schema: PayloadSchema,
}

impl CollectorSpec {
    /// Returns a copy of this spec with a different declared timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns `true` if this collector applies to the given identifier type.
    pub fn applicable(&self, kind: IdentifierKind) -> bool {
        self.applies_to.contains(&kind)
    }
}

/// Errors a collector may report from `run`.
///
/// These are always recovered into a [`CollectorOutcome`] and never abort an
/// investigation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectorError {
    #[error("collector cancelled")]
    Cancelled,

    #[error("upstream failure: {0}")]
    UpstreamFailure(String),

    #[error("collector not applicable to this identifier")]
    NotApplicable,
}

/// Errors raised before any collector is dispatched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrchestrationError {
    #[error("total budget must be positive, got {0:?}")]
    InvalidBudget(Duration),

    #[error("maximum concurrency must be at least 1")]
    InvalidConcurrency,
}

/// Final status of a single collector run.
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeStatus {
    Ok(Payload),
    TimedOut,
    Failed(String),
    Skipped(String),
}

impl OutcomeStatus {
    /// Stable, machine-readable label used in logs, metrics and JSON.
    pub fn label(&self) -> &'static str {
        match self {
            OutcomeStatus::Ok(_) => "ok",
            OutcomeStatus::TimedOut => "timed_out",
            OutcomeStatus::Failed(_) => "failed",
            OutcomeStatus::Skipped(_) => "skipped",
        }
    }

    /// A failed or timed-out run counts against the overall status.
    pub fn is_failure(&self) -> bool {
        matches!(self, OutcomeStatus::TimedOut | OutcomeStatus::Failed(_))
    }

    pub fn payload(&self) -> Option<&Payload> {
        match self {
            OutcomeStatus::Ok(payload) => Some(payload),
            _ => None,
        }
    }
}

/// The result of running one collector against one identifier.
///
/// Created once by the orchestrator when the collector finishes or is
/// abandoned, and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectorOutcome {
    pub identifier: Identifier,
    pub collector: String,
    pub status: OutcomeStatus,
    pub duration: Duration,
}

impl CollectorOutcome {
    pub fn new(
        identifier: Identifier,
        collector: impl Into<String>,
        status: OutcomeStatus,
        duration: Duration,
    ) -> Self {
        Self {
            identifier,
            collector: collector.into(),
            status,
            duration,
        }
    }
}

// =============================================================================
// Service Traits
// =============================================================================

/// A unit of work performing one kind of lookup against a target.
#[async_trait]
pub trait Collector: Send + Sync {
    /// The static descriptor of this collector.
    fn spec(&self) -> &CollectorSpec;

    fn name(&self) -> &str {
        self.spec().name
    }

    fn applicable(&self, kind: IdentifierKind) -> bool {
        self.spec().applicable(kind)
    }

    fn timeout(&self) -> Duration {
        self.spec().timeout
    }

    /// Runs the lookup.
    ///
    /// Implementations must observe `cancel` and return
    /// `Err(CollectorError::Cancelled)` promptly once it flips to `true`.
    async fn run(
        &self,
        identifier: &Identifier,
        cancel: CancelSignal,
    ) -> Result<Payload, CollectorError>;
}

/// Provides raw findings for a collector.
///
/// This is the substitution point between the deterministic fixture source
/// and a real external API client.
#[async_trait]
pub trait FindingSource: Send + Sync {
    /// Fetches the payload a collector described by `spec` reports for `identifier`.
    async fn fetch(
        &self,
        identifier: &Identifier,
        spec: &CollectorSpec,
    ) -> Result<Payload, CollectorError>;
}

/// Receives progress events from the orchestrator.
///
/// This replaces a process-wide console: every investigation is handed the
/// observer it should report to.
pub trait InvestigationObserver: Send + Sync {
    fn on_dispatch(&self, _identifier: &Identifier, _spec: &CollectorSpec) {}

    fn on_outcome(&self, _outcome: &CollectorOutcome) {}

    fn on_report(&self, _report: &Report) {}
}

/// Sends reports to output destinations
#[async_trait]
pub trait Output: Send + Sync {
    /// A unique, descriptive name for the output (e.g., "stdout", "json_file").
    /// Used for logging and metrics.
    fn name(&self) -> &str;

    /// Sends a report to the configured output destination
    ///
    /// # Returns
    /// * `Ok(())` if the report was successfully written
    /// * `Err` if writing failed (I/O error, serialization error, etc.)
    async fn send_report(&self, report: &Report) -> Result<()>;
}
