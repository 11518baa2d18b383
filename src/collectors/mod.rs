//! Collector implementations.
//!
//! One submodule per information domain, each holding the collector's spec
//! and its fixture catalog. A [`SourceCollector`] runs any of those specs
//! against a [`FindingSource`] (the deterministic fixture source by default)
//! and owns the retry policy; the orchestrator only sees the [`Collector`]
//! trait.

pub mod breach;
pub mod company;
pub mod dns;
pub mod domain_metadata;
pub mod ip_intel;
pub mod paste;
pub mod social;
pub mod whois;

use crate::config::CollectorsConfig;
use crate::core::{Collector, CollectorError, CollectorSpec, FindingSource};
use crate::identifier::Identifier;
use crate::payload::Payload;
use crate::types::CancelSignal;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Declared timeout of a collector when the configuration does not override it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Execution settings shared by the fixture-backed collectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Artificial delay before the lookup, standing in for network latency.
    pub latency: Duration,
    /// Number of retries after an upstream failure.
    pub retries: u32,
    /// Initial backoff between retries; doubles on every attempt.
    pub retry_backoff: Duration,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            latency: Duration::ZERO,
            retries: 0,
            retry_backoff: Duration::from_millis(200),
        }
    }
}

impl RunSettings {
    pub fn from_config(config: &CollectorsConfig) -> Self {
        Self {
            latency: Duration::from_millis(config.simulated_latency_ms),
            retries: config.retries,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }
}

/// A collector described by one of the built-in specs and answered by a
/// [`FindingSource`]. Which findings it reports depends only on its spec.
pub struct SourceCollector {
    spec: CollectorSpec,
    source: Arc<dyn FindingSource>,
    settings: RunSettings,
}

impl SourceCollector {
    pub fn new(spec: CollectorSpec, source: Arc<dyn FindingSource>, settings: RunSettings) -> Self {
        Self {
            spec,
            source,
            settings,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.spec = self.spec.with_timeout(timeout);
        self
    }
}

#[async_trait]
impl Collector for SourceCollector {
    fn spec(&self) -> &CollectorSpec {
        &self.spec
    }

    async fn run(
        &self,
        identifier: &Identifier,
        cancel: CancelSignal,
    ) -> Result<Payload, CollectorError> {
        fetch_with_retry(
            &self.spec,
            self.source.as_ref(),
            identifier,
            &self.settings,
            cancel,
        )
        .await
    }
}

/// Builds the standard collector set in registration order, applying the
/// per-collector overrides from the configuration.
pub fn standard_collectors(
    config: &CollectorsConfig,
    source: Arc<dyn FindingSource>,
) -> Vec<Arc<dyn Collector>> {
    let settings = RunSettings::from_config(config);
    standard_specs()
        .into_iter()
        .filter(|spec| {
            let enabled = config.is_enabled(spec.name);
            if !enabled {
                debug!(collector = spec.name, "Collector disabled by configuration");
            }
            enabled
        })
        .map(|spec| {
            let timeout = config.timeout_for(spec.name);
            Arc::new(SourceCollector::new(spec, source.clone(), settings.clone()).with_timeout(timeout))
                as Arc<dyn Collector>
        })
        .collect()
}

/// Specs of every built-in collector, in registration order.
pub fn standard_specs() -> Vec<CollectorSpec> {
    vec![
        breach::spec(),
        paste::spec(),
        social::spec(),
        domain_metadata::spec(),
        dns::spec(),
        whois::spec(),
        ip_intel::spec(),
        company::spec(),
    ]
}

/// Fetches findings from `source`, retrying upstream failures with
/// exponential backoff. Every wait observes `cancel`.
pub(crate) async fn fetch_with_retry(
    spec: &CollectorSpec,
    source: &dyn FindingSource,
    identifier: &Identifier,
    settings: &RunSettings,
    mut cancel: CancelSignal,
) -> Result<Payload, CollectorError> {
    wait_or_cancel(settings.latency, &mut cancel).await?;

    let mut attempt = 0;
    loop {
        if *cancel.borrow() {
            return Err(CollectorError::Cancelled);
        }
        match source.fetch(identifier, spec).await {
            Err(CollectorError::UpstreamFailure(reason)) if attempt < settings.retries => {
                let backoff = settings
                    .retry_backoff
                    .saturating_mul(2_u32.saturating_pow(attempt));
                debug!(
                    collector = spec.name,
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %reason,
                    "Upstream failure, retrying after backoff"
                );
                wait_or_cancel(backoff, &mut cancel).await?;
                attempt += 1;
            }
            result => return result,
        }
    }
}

/// Sleeps for `delay` unless the cancel signal fires first.
///
/// A dropped sender means the orchestrator has abandoned the run, which is
/// treated the same as an explicit cancellation.
pub(crate) async fn wait_or_cancel(
    delay: Duration,
    cancel: &mut CancelSignal,
) -> Result<(), CollectorError> {
    if *cancel.borrow_and_update() {
        return Err(CollectorError::Cancelled);
    }
    if delay.is_zero() {
        return Ok(());
    }

    let sleep = tokio::time::sleep(delay);
    tokio::pin!(sleep);
    loop {
        tokio::select! {
            biased;
            changed = cancel.changed() => {
                if changed.is_err() || *cancel.borrow_and_update() {
                    trace!("Cancellation observed while waiting");
                    return Err(CollectorError::Cancelled);
                }
            }
            _ = &mut sleep => return Ok(()),
        }
    }
}
