#![allow(dead_code)]
use footprint::core::{CollectorOutcome, CollectorSpec, InvestigationObserver};
use footprint::identifier::Identifier;
use footprint::report::Report;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Dispatch(String),
    Outcome(String, &'static str),
    Report(&'static str),
}

/// An observer that records every event it receives, in order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<Event>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl InvestigationObserver for RecordingObserver {
    fn on_dispatch(&self, _identifier: &Identifier, spec: &CollectorSpec) {
        self.push(Event::Dispatch(spec.name.to_string()));
    }

    fn on_outcome(&self, outcome: &CollectorOutcome) {
        self.push(Event::Outcome(outcome.collector.clone(), outcome.status.label()));
    }

    fn on_report(&self, report: &Report) {
        self.push(Event::Report(report.overall_status().as_str()));
    }
}
