mod helpers;

use footprint::core::{CollectorOutcome, OutcomeStatus};
use footprint::identifier::normalize;
use footprint::orchestrator::Orchestrator;
use footprint::report::{aggregate, REPORT_SCHEMA_VERSION};
use helpers::mock_collectors::*;
use helpers::table;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_report_document_shape() -> anyhow::Result<()> {
    let table = table(vec![
        Arc::new(StaticCollector::new("found", EMAIL_ONLY)),
        Arc::new(FailingCollector::new("broken", EMAIL_ONLY, "HTTP 429")),
        Arc::new(RefusingCollector::new("picky", EMAIL_ONLY)),
    ]);
    let report = Orchestrator::new()
        .investigate(normalize("Alice@Example.com")?, &table, Duration::from_secs(1))
        .await?;

    let doc: Value = serde_json::from_str(&report.to_json_pretty()?)?;

    assert_eq!(doc["schema_version"], REPORT_SCHEMA_VERSION);
    assert_eq!(doc["target"], "Alice@example.com");
    assert_eq!(doc["identifier_type"], "email");
    assert_eq!(doc["overall_status"], "partial_failure");
    assert!(doc["started_at"].is_string());
    assert!(doc["finished_at"].is_string());

    let outcomes = doc["outcomes"].as_array().expect("outcomes array");
    assert_eq!(outcomes.len(), 3);

    assert_eq!(outcomes[0]["collector"], "found");
    assert_eq!(outcomes[0]["status"], "ok");
    assert_eq!(outcomes[0]["payload"]["schema"], "paste");
    assert!(outcomes[0].get("error").is_none());

    assert_eq!(outcomes[1]["status"], "failed");
    assert_eq!(outcomes[1]["error"], "HTTP 429");
    assert!(outcomes[1].get("payload").is_none());

    assert_eq!(outcomes[2]["status"], "skipped");
    assert_eq!(outcomes[2]["error"], "not applicable to email targets");
    Ok(())
}

#[test]
fn test_timed_out_outcome_has_fixed_error_text() {
    let target = normalize("example.com").unwrap();
    let now = chrono::Utc::now();
    let report = aggregate(
        target.clone(),
        vec![CollectorOutcome::new(
            target,
            "dns",
            OutcomeStatus::TimedOut,
            Duration::from_millis(1500),
        )],
        now,
        now,
    );

    let doc: Value = serde_json::to_value(report.document()).unwrap();
    let outcome = &doc["outcomes"][0];
    assert_eq!(outcome["status"], "timed_out");
    assert_eq!(outcome["error"], "collector timed out");
    assert_eq!(outcome["duration_ms"], 1500);
    assert_eq!(doc["overall_status"], "total_failure");
}
