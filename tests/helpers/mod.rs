#![allow(dead_code)]
pub mod mock_collectors;
pub mod recording_observer;

use footprint::config::CollectorsConfig;
use footprint::core::Collector;
use footprint::fixtures::FixtureSource;
use footprint::routing::RoutingTable;
use std::sync::Arc;

/// The built-in collectors backed by the fixture source, with default settings.
pub fn standard_table() -> RoutingTable {
    RoutingTable::standard(&CollectorsConfig::default(), Arc::new(FixtureSource))
}

/// A routing table over the given collectors, in the given order.
pub fn table(collectors: Vec<Arc<dyn Collector>>) -> RoutingTable {
    RoutingTable::new(collectors)
}
