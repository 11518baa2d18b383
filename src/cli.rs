//! Command-Line Interface (CLI) argument parsing.
//!
//! The arguments are parsed at startup and merged over `footprint.toml` and
//! the environment; `Cli` is itself a `figment` provider for the flags that
//! map onto configuration.

use clap::Parser;
use figment::{
    value::{Dict, Map, Value},
    Error, Metadata, Profile, Provider,
};
use std::path::PathBuf;

/// OSINT footprint investigator: breaches, pastes, social profiles, domains,
/// IP addresses and companies.
#[derive(Parser, Debug, Default, Clone)]
#[command(name = "footprint", author, version, about, long_about = None)]
pub struct Cli {
    /// Investigation module to run (see --list-modules).
    #[arg(short, long, value_name = "MODULE")]
    pub module: Option<String>,

    /// Target to investigate: email, username, domain, IP or company name.
    #[arg(short, long, value_name = "TARGET")]
    pub target: Option<String>,

    /// Show per-collector details and debug logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Also write the JSON report to this file.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Maximum number of collectors running at once.
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,

    /// Start an interactive session.
    #[arg(short, long)]
    pub interactive: bool,

    /// List the available modules and exit.
    #[arg(short = 'l', long)]
    pub list_modules: bool,

    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Total investigation budget in milliseconds.
    #[arg(long, value_name = "MS")]
    pub budget_ms: Option<u64>,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Log Prometheus metrics at the end of the run.
    #[arg(long)]
    pub metrics: bool,
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict = Dict::new();

        if self.verbose {
            dict.insert("log_level".into(), Value::from("debug"));
        }

        let mut orchestrator = Dict::new();
        if let Some(threads) = self.threads {
            orchestrator.insert("max_concurrency".into(), Value::from(threads as u64));
        }
        if let Some(budget) = self.budget_ms {
            orchestrator.insert("total_budget_ms".into(), Value::from(budget));
        }
        if !orchestrator.is_empty() {
            dict.insert("orchestrator".into(), Value::from(orchestrator));
        }

        let mut output = Dict::new();
        if self.json {
            output.insert("format".into(), Value::from("Json"));
        }
        if let Some(path) = &self.output {
            output.insert("path".into(), Value::from(path.display().to_string()));
        }
        if !output.is_empty() {
            dict.insert("output".into(), Value::from(output));
        }

        // Flags can only switch metrics on; `false` means "not given".
        if self.metrics {
            let mut metrics = Dict::new();
            metrics.insert("enabled".into(), Value::from(true));
            dict.insert("metrics".into(), Value::from(metrics));
        }

        let mut map = Map::new();
        map.insert(Profile::Default, dict);
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from([
            "footprint", "-m", "email", "-t", "alice@example.com", "-v", "--threads", "3",
            "--budget-ms", "1500", "--json",
        ]);
        assert_eq!(cli.module.as_deref(), Some("email"));
        assert_eq!(cli.target.as_deref(), Some("alice@example.com"));
        assert!(cli.verbose);
        assert_eq!(cli.threads, Some(3));
        assert_eq!(cli.budget_ms, Some(1500));
        assert!(cli.json);
    }

    #[test]
    fn test_unset_flags_provide_nothing() {
        let data = Cli::default().data().unwrap();
        assert!(data[&Profile::Default].is_empty());
    }
}
