//! Configuration management for Footprint
//!
//! This module defines the main `Config` struct and its sub-structs. Settings
//! are layered with `figment`: built-in defaults, then a `footprint.toml`
//! file, then `FOOTPRINT_` environment variables, then command-line flags.
//!
//! Only the binary reads configuration; the library core is handed plain
//! values (a routing table, an orchestrator, a budget).

use crate::cli::Cli;
use crate::collectors::DEFAULT_TIMEOUT;
use crate::orchestrator::{DEFAULT_GRACE_PERIOD, DEFAULT_MAX_CONCURRENCY};
use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration file picked up from the working directory when no
/// `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "footprint.toml";

/// The main configuration struct for the application.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// The logging level for the application.
    pub log_level: String,
    /// Budget and concurrency of an investigation.
    pub orchestrator: OrchestratorConfig,
    /// Collector defaults and per-collector overrides.
    pub collectors: CollectorsConfig,
    /// Where and how reports are written.
    pub output: OutputConfig,
    /// Prometheus metrics rendering.
    pub metrics: MetricsConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OrchestratorConfig {
    /// Wall-clock budget of a whole investigation, in milliseconds.
    pub total_budget_ms: u64,
    /// Time cancelled collectors get to wind down, in milliseconds.
    pub grace_period_ms: u64,
    /// Maximum number of collectors running at once.
    pub max_concurrency: usize,
}

impl OrchestratorConfig {
    pub fn total_budget(&self) -> Duration {
        Duration::from_millis(self.total_budget_ms)
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CollectorsConfig {
    /// Timeout applied to collectors without an override, in milliseconds.
    pub default_timeout_ms: u64,
    /// Artificial latency of the fixture-backed collectors, in milliseconds.
    pub simulated_latency_ms: u64,
    /// Retries after an upstream failure.
    pub retries: u32,
    /// Initial retry backoff in milliseconds; doubles on every retry.
    pub retry_backoff_ms: u64,
    /// Per-collector settings, keyed by collector name.
    #[serde(default)]
    pub overrides: BTreeMap<String, CollectorOverride>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CollectorOverride {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

fn default_enabled() -> bool {
    true
}

impl CollectorsConfig {
    pub fn timeout_for(&self, collector: &str) -> Duration {
        let ms = self
            .overrides
            .get(collector)
            .and_then(|o| o.timeout_ms)
            .unwrap_or(self.default_timeout_ms);
        Duration::from_millis(ms)
    }

    pub fn is_enabled(&self, collector: &str) -> bool {
        self.overrides.get(collector).map_or(true, |o| o.enabled)
    }
}

/// The report format.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    PlainText,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OutputConfig {
    /// Format of the report written to stdout.
    pub format: OutputFormat,
    /// Optional file the JSON report is also written to.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MetricsConfig {
    /// Record metrics and log the Prometheus exposition after each run.
    pub enabled: bool,
}

impl Config {
    /// Loads the application configuration.
    ///
    /// An explicit `--config` path must exist; the default file is optional.
    pub fn load(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) if !path.exists() => {
                bail!("configuration file not found: {}", path.display())
            }
            Some(path) => path.clone(),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            // e.g. FOOTPRINT_ORCHESTRATOR__TOTAL_BUDGET_MS=5000
            .merge(Env::prefixed("FOOTPRINT_").split("__"))
            .merge(cli.clone())
            .extract()?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            orchestrator: OrchestratorConfig {
                total_budget_ms: 30_000,
                grace_period_ms: DEFAULT_GRACE_PERIOD.as_millis() as u64,
                max_concurrency: DEFAULT_MAX_CONCURRENCY,
            },
            collectors: CollectorsConfig::default(),
            output: OutputConfig {
                format: OutputFormat::PlainText,
                path: None,
            },
            metrics: MetricsConfig { enabled: false },
        }
    }
}

impl Default for CollectorsConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            simulated_latency_ms: 0,
            retries: 0,
            retry_backoff_ms: 200,
            overrides: BTreeMap::new(),
        }
    }
}
