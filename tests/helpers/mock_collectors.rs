#![allow(dead_code)]
use async_trait::async_trait;
use footprint::core::{Collector, CollectorError, CollectorSpec};
use footprint::identifier::{Identifier, IdentifierKind};
use footprint::payload::{Payload, PastePayload, PayloadSchema};
use footprint::types::CancelSignal;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

pub const EMAIL_ONLY: &[IdentifierKind] = &[IdentifierKind::Email];
pub const DOMAIN_ONLY: &[IdentifierKind] = &[IdentifierKind::Domain];

/// A paste-schema spec with the given name, applicability and timeout.
pub fn spec(name: &'static str, applies_to: &'static [IdentifierKind], timeout: Duration) -> CollectorSpec {
    CollectorSpec {
        name,
        description: "test collector",
        applies_to,
        timeout,
        schema: PayloadSchema::Paste,
    }
}

pub fn empty_payload() -> Payload {
    Payload::Paste(PastePayload { pastes: vec![] })
}

/// Sleeps for `delay`, returning early with `Cancelled` if the signal fires.
async fn cancellable_sleep(delay: Duration, cancel: &mut CancelSignal) -> Result<(), CollectorError> {
    tokio::select! {
        _ = tokio::time::sleep(delay) => Ok(()),
        _ = cancel.wait_for(|cancelled| *cancelled) => Err(CollectorError::Cancelled),
    }
}

/// Succeeds with an empty payload after `delay`.
pub struct StaticCollector {
    pub spec: CollectorSpec,
    pub delay: Duration,
}

impl StaticCollector {
    pub fn new(name: &'static str, applies_to: &'static [IdentifierKind]) -> Self {
        Self {
            spec: spec(name, applies_to, Duration::from_secs(5)),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl Collector for StaticCollector {
    fn spec(&self) -> &CollectorSpec {
        &self.spec
    }

    async fn run(&self, _identifier: &Identifier, mut cancel: CancelSignal) -> Result<Payload, CollectorError> {
        cancellable_sleep(self.delay, &mut cancel).await?;
        Ok(empty_payload())
    }
}

/// Always reports an upstream failure.
pub struct FailingCollector {
    pub spec: CollectorSpec,
    pub reason: String,
}

impl FailingCollector {
    pub fn new(name: &'static str, applies_to: &'static [IdentifierKind], reason: &str) -> Self {
        Self {
            spec: spec(name, applies_to, Duration::from_secs(5)),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl Collector for FailingCollector {
    fn spec(&self) -> &CollectorSpec {
        &self.spec
    }

    async fn run(&self, _identifier: &Identifier, _cancel: CancelSignal) -> Result<Payload, CollectorError> {
        Err(CollectorError::UpstreamFailure(self.reason.clone()))
    }
}

/// Takes `delay` to finish. When `ignores_cancel` is set it keeps sleeping
/// after the cancel signal fires.
pub struct SlowCollector {
    pub spec: CollectorSpec,
    pub delay: Duration,
    pub ignores_cancel: bool,
}

impl SlowCollector {
    pub fn new(name: &'static str, applies_to: &'static [IdentifierKind], delay: Duration, timeout: Duration) -> Self {
        Self {
            spec: spec(name, applies_to, timeout),
            delay,
            ignores_cancel: false,
        }
    }

    pub fn ignoring_cancel(mut self) -> Self {
        self.ignores_cancel = true;
        self
    }
}

#[async_trait]
impl Collector for SlowCollector {
    fn spec(&self) -> &CollectorSpec {
        &self.spec
    }

    async fn run(&self, _identifier: &Identifier, mut cancel: CancelSignal) -> Result<Payload, CollectorError> {
        if self.ignores_cancel {
            tokio::time::sleep(self.delay).await;
        } else {
            cancellable_sleep(self.delay, &mut cancel).await?;
        }
        Ok(empty_payload())
    }
}

/// Panics when run.
pub struct PanickingCollector {
    pub spec: CollectorSpec,
}

impl PanickingCollector {
    pub fn new(name: &'static str, applies_to: &'static [IdentifierKind]) -> Self {
        Self {
            spec: spec(name, applies_to, Duration::from_secs(5)),
        }
    }
}

#[async_trait]
impl Collector for PanickingCollector {
    fn spec(&self) -> &CollectorSpec {
        &self.spec
    }

    async fn run(&self, _identifier: &Identifier, _cancel: CancelSignal) -> Result<Payload, CollectorError> {
        panic!("collector blew up");
    }
}

/// Reports `NotApplicable` even though its spec claims the identifier type.
pub struct RefusingCollector {
    pub spec: CollectorSpec,
}

impl RefusingCollector {
    pub fn new(name: &'static str, applies_to: &'static [IdentifierKind]) -> Self {
        Self {
            spec: spec(name, applies_to, Duration::from_secs(5)),
        }
    }
}

#[async_trait]
impl Collector for RefusingCollector {
    fn spec(&self) -> &CollectorSpec {
        &self.spec
    }

    async fn run(&self, _identifier: &Identifier, _cancel: CancelSignal) -> Result<Payload, CollectorError> {
        Err(CollectorError::NotApplicable)
    }
}

/// Tracks how many instances are running at once.
#[derive(Clone, Default)]
pub struct ConcurrencyProbe {
    pub current: Arc<AtomicUsize>,
    pub peak: Arc<AtomicUsize>,
}

impl ConcurrencyProbe {
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

pub struct ProbedCollector {
    pub spec: CollectorSpec,
    pub delay: Duration,
    pub probe: ConcurrencyProbe,
}

impl ProbedCollector {
    pub fn new(name: &'static str, delay: Duration, probe: ConcurrencyProbe) -> Self {
        Self {
            spec: spec(name, EMAIL_ONLY, Duration::from_secs(5)),
            delay,
            probe,
        }
    }
}

#[async_trait]
impl Collector for ProbedCollector {
    fn spec(&self) -> &CollectorSpec {
        &self.spec
    }

    async fn run(&self, _identifier: &Identifier, _cancel: CancelSignal) -> Result<Payload, CollectorError> {
        let now = self.probe.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.probe.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.probe.current.fetch_sub(1, Ordering::SeqCst);
        Ok(empty_payload())
    }
}
