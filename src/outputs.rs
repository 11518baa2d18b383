//! Output destinations and management.
//!
//! Reports go to stdout in the configured format and, optionally, to a JSON
//! file. The `OutputManager` fans each report out to every destination.

use crate::core::Output;
use crate::formatting::{JsonFormatter, ReportFormatter};
use crate::report::Report;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error};

/// Prints rendered reports to stdout.
pub struct StdoutOutput {
    formatter: Box<dyn ReportFormatter>,
}

impl StdoutOutput {
    pub fn new(formatter: Box<dyn ReportFormatter>) -> Self {
        Self { formatter }
    }
}

#[async_trait]
impl Output for StdoutOutput {
    fn name(&self) -> &str {
        "stdout"
    }

    async fn send_report(&self, report: &Report) -> Result<()> {
        let rendered = self.formatter.format_report(report)?;
        println!("{}", rendered.trim_end());
        Ok(())
    }
}

/// Writes the JSON report document to a file, replacing any previous content.
pub struct JsonFileOutput {
    path: PathBuf,
}

impl JsonFileOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Output for JsonFileOutput {
    fn name(&self) -> &str {
        "json_file"
    }

    async fn send_report(&self, report: &Report) -> Result<()> {
        let json = JsonFormatter.format_report(report)?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("failed to write report to {}", self.path.display()))?;
        debug!(path = %self.path.display(), "Report written");
        Ok(())
    }
}

/// Dispatches a report to multiple outputs.
///
/// A failing output is logged and does not keep the others from receiving
/// the report.
pub struct OutputManager {
    outputs: Vec<Arc<dyn Output>>,
}

impl OutputManager {
    pub fn new(outputs: Vec<Arc<dyn Output>>) -> Self {
        Self { outputs }
    }

    /// Sends `report` to every output. Returns the number of outputs that failed.
    pub async fn send_report(&self, report: &Report) -> usize {
        let mut failures = 0;
        for output in &self.outputs {
            if let Err(e) = output.send_report(report).await {
                failures += 1;
                error!(output = output.name(), error = %e, "Failed to send report");
            }
        }
        failures
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::normalize;
    use crate::report::aggregate;
    use chrono::Utc;

    fn empty_report() -> Report {
        let now = Utc::now();
        aggregate(normalize("example.com").unwrap(), vec![], now, now)
    }

    #[tokio::test]
    async fn test_json_file_output_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        JsonFileOutput::new(&path)
            .send_report(&empty_report())
            .await
            .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["target"], "example.com");
        assert_eq!(json["identifier_type"], "domain");
    }

    #[tokio::test]
    async fn test_manager_continues_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("ok.json");
        let bad = dir.path().join("missing").join("report.json");
        let manager = OutputManager::new(vec![
            Arc::new(JsonFileOutput::new(&bad)),
            Arc::new(JsonFileOutput::new(&good)),
        ]);

        assert_eq!(manager.send_report(&empty_report()).await, 1);
        assert!(good.exists());
    }
}
