//! Application wiring.
//!
//! Turns the resolved configuration into a [`Session`] (routing table,
//! orchestrator, outputs) and runs it in one-shot or interactive mode.

use crate::cli::Cli;
use crate::config::{Config, OutputFormat};
use crate::core::{FindingSource, Output};
use crate::fixtures::FixtureSource;
use crate::formatting::{module_listing, JsonFormatter, PlainTextFormatter, ReportFormatter};
use crate::interactive;
use crate::internal_metrics::{install_prometheus, Metrics};
use crate::modules::InvestigationModule;
use crate::orchestrator::{InvestigationError, Orchestrator};
use crate::outputs::{JsonFileOutput, OutputManager, StdoutOutput};
use crate::report::Report;
use crate::routing::RoutingTable;
use anyhow::Result;
use clap::CommandFactory;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Everything needed to run investigations, resolved once at startup.
pub struct Session {
    routing: RoutingTable,
    orchestrator: Orchestrator,
    budget: Duration,
    format: OutputFormat,
    report_path: Option<PathBuf>,
}

impl Session {
    pub fn new(
        routing: RoutingTable,
        orchestrator: Orchestrator,
        budget: Duration,
        format: OutputFormat,
    ) -> Self {
        Self {
            routing,
            orchestrator,
            budget,
            format,
            report_path: None,
        }
    }

    /// Also write every report as JSON to `path`.
    pub fn with_report_path(mut self, path: Option<PathBuf>) -> Self {
        self.report_path = path;
        self
    }

    pub fn from_config(config: &Config, source: Arc<dyn FindingSource>) -> Self {
        let routing = RoutingTable::standard(&config.collectors, source);
        let orchestrator = Orchestrator::new()
            .with_grace_period(config.orchestrator.grace_period())
            .with_max_concurrency(config.orchestrator.max_concurrency)
            .with_metrics(Metrics::new());
        debug!(collectors = ?routing, "Routing table ready");

        Self::new(
            routing,
            orchestrator,
            config.orchestrator.total_budget(),
            config.output.format,
        )
        .with_report_path(config.output.path.clone())
    }

    pub fn routing(&self) -> &RoutingTable {
        &self.routing
    }

    /// Parses `target` the way `module` expects and investigates it.
    pub async fn investigate(
        &self,
        module: InvestigationModule,
        target: &str,
    ) -> Result<Report, InvestigationError> {
        let identifier = module.identify(target)?;
        let routing = module.routing(&self.routing);
        Ok(self
            .orchestrator
            .investigate(identifier, &routing, self.budget)
            .await?)
    }

    /// Investigates and sends the report to stdout and any report file.
    /// `output` overrides the configured report file for this run.
    pub async fn execute(
        &self,
        module: InvestigationModule,
        target: &str,
        verbose: bool,
        output: Option<PathBuf>,
    ) -> Result<Report, InvestigationError> {
        let report = self.investigate(module, target).await?;
        let failures = self.outputs(verbose, output).send_report(&report).await;
        if failures > 0 {
            warn!(failures, "Report could not be delivered to every output");
        }
        Ok(report)
    }

    fn outputs(&self, verbose: bool, output: Option<PathBuf>) -> OutputManager {
        let formatter: Box<dyn ReportFormatter> = match self.format {
            OutputFormat::Json => Box::new(JsonFormatter),
            OutputFormat::PlainText => Box::new(PlainTextFormatter::new(verbose)),
        };
        let mut outputs: Vec<Arc<dyn Output>> = vec![Arc::new(StdoutOutput::new(formatter))];
        if let Some(path) = output.or_else(|| self.report_path.clone()) {
            outputs.push(Arc::new(JsonFileOutput::new(path)));
        }
        OutputManager::new(outputs)
    }
}

/// Runs the application and returns the process exit code.
pub async fn run(cli: &Cli, config: &Config) -> Result<ExitCode> {
    if cli.list_modules {
        print!("{}", module_listing());
        return Ok(ExitCode::SUCCESS);
    }

    let prometheus = if config.metrics.enabled {
        Some(install_prometheus()?)
    } else {
        None
    };
    let session = Session::from_config(config, Arc::new(FixtureSource));

    let code = if cli.interactive {
        let summary = interactive::run(&session).await?;
        debug!(?summary, "Interactive session ended");
        ExitCode::SUCCESS
    } else {
        match (cli.module.as_deref(), cli.target.as_deref()) {
            (Some(module), Some(target)) => run_once(&session, module, target, cli.verbose).await,
            _ => {
                eprintln!("error: --module and --target are required unless --interactive or --list-modules is given\n");
                eprintln!("{}", Cli::command().render_help());
                ExitCode::from(1)
            }
        }
    };

    if let Some(handle) = prometheus {
        info!("Metrics snapshot:\n{}", handle.render());
    }
    Ok(code)
}

async fn run_once(session: &Session, module: &str, target: &str, verbose: bool) -> ExitCode {
    let module: InvestigationModule = match module.parse() {
        Ok(module) => module,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(1);
        }
    };

    match session.execute(module, target, verbose, None).await {
        Ok(report) => {
            info!(status = %report.overall_status(), "Done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::IdentifierKind;
    use crate::report::OverallStatus;

    fn session() -> Session {
        Session::from_config(&Config::default(), Arc::new(FixtureSource))
    }

    #[tokio::test]
    async fn test_whois_module_runs_only_whois() {
        let report = session()
            .investigate(InvestigationModule::Whois, "example.com")
            .await
            .unwrap();
        assert_eq!(report.outcomes().len(), 1);
        assert_eq!(report.outcomes()[0].collector, "whois");
        assert_eq!(report.overall_status(), OverallStatus::Complete);
    }

    #[tokio::test]
    async fn test_social_module_treats_target_as_username() {
        let report = session()
            .investigate(InvestigationModule::Social, "alice.example")
            .await
            .unwrap();
        assert_eq!(report.identifier().kind(), IdentifierKind::Username);
        assert_eq!(report.outcomes().len(), 3);
    }

    #[tokio::test]
    async fn test_validation_error_surfaces() {
        let err = session()
            .investigate(InvestigationModule::Ip, "999.1.1.1")
            .await
            .unwrap_err();
        assert!(matches!(err, InvestigationError::Validation(_)));
    }
}
