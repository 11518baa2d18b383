//! Report aggregation.
//!
//! A [`Report`] is assembled exactly once from the outcomes of a finished
//! investigation and is read-only afterwards.

use crate::core::{CollectorOutcome, OutcomeStatus};
use crate::identifier::{Identifier, IdentifierKind};
use crate::payload::Payload;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Version of the JSON report document.
pub const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    /// No collector failed or timed out.
    Complete,
    /// Some, but not all, collectors failed or timed out.
    PartialFailure,
    /// Every collector failed or timed out.
    TotalFailure,
}

impl OverallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallStatus::Complete => "complete",
            OverallStatus::PartialFailure => "partial_failure",
            OverallStatus::TotalFailure => "total_failure",
        }
    }

    /// Derives the status from a set of outcomes. Skipped outcomes are
    /// neither successes nor failures.
    pub fn from_outcomes(outcomes: &[CollectorOutcome]) -> Self {
        let failures = outcomes.iter().filter(|o| o.status.is_failure()).count();
        if failures == 0 {
            OverallStatus::Complete
        } else if failures == outcomes.len() {
            OverallStatus::TotalFailure
        } else {
            OverallStatus::PartialFailure
        }
    }
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The aggregated result of one investigation.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    identifier: Identifier,
    outcomes: Vec<CollectorOutcome>,
    overall_status: OverallStatus,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
}

/// Assembles a report. Outcomes keep the order they are given in, which is
/// the routing table's registration order.
pub fn aggregate(
    identifier: Identifier,
    outcomes: Vec<CollectorOutcome>,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
) -> Report {
    Report {
        overall_status: OverallStatus::from_outcomes(&outcomes),
        identifier,
        outcomes,
        started_at,
        finished_at,
    }
}

impl Report {
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn outcomes(&self) -> &[CollectorOutcome] {
        &self.outcomes
    }

    pub fn overall_status(&self) -> OverallStatus {
        self.overall_status
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    /// Outcome counts as (ok, failed or timed out, skipped).
    pub fn tally(&self) -> (usize, usize, usize) {
        self.outcomes
            .iter()
            .fold((0, 0, 0), |(ok, failed, skipped), o| match o.status {
                OutcomeStatus::Ok(_) => (ok + 1, failed, skipped),
                OutcomeStatus::Skipped(_) => (ok, failed, skipped + 1),
                OutcomeStatus::TimedOut | OutcomeStatus::Failed(_) => (ok, failed + 1, skipped),
            })
    }

    /// The serializable form of this report.
    pub fn document(&self) -> ReportDocument<'_> {
        ReportDocument {
            schema_version: REPORT_SCHEMA_VERSION,
            target: self.identifier.display(),
            identifier_type: self.identifier.kind(),
            generated_at: Utc::now(),
            started_at: self.started_at,
            finished_at: self.finished_at,
            overall_status: self.overall_status,
            outcomes: self.outcomes.iter().map(OutcomeDocument::from).collect(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.document())?)
    }
}

/// JSON shape of a report.
#[derive(Debug, Serialize)]
pub struct ReportDocument<'a> {
    pub schema_version: u32,
    pub target: &'a str,
    pub identifier_type: IdentifierKind,
    pub generated_at: DateTime<Utc>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub overall_status: OverallStatus,
    pub outcomes: Vec<OutcomeDocument<'a>>,
}

#[derive(Debug, Serialize)]
pub struct OutcomeDocument<'a> {
    pub collector: &'a str,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<&'a Payload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
    pub duration_ms: u64,
}

impl<'a> From<&'a CollectorOutcome> for OutcomeDocument<'a> {
    fn from(outcome: &'a CollectorOutcome) -> Self {
        let (payload, error) = match &outcome.status {
            OutcomeStatus::Ok(payload) => (Some(payload), None),
            OutcomeStatus::TimedOut => (None, Some("collector timed out")),
            OutcomeStatus::Failed(reason) | OutcomeStatus::Skipped(reason) => {
                (None, Some(reason.as_str()))
            }
        };
        Self {
            collector: &outcome.collector,
            status: outcome.status.label(),
            payload,
            error,
            duration_ms: outcome.duration.as_millis() as u64,
        }
    }
}
