//! The routing table: which collectors run for an identifier type.

use crate::collectors::standard_collectors;
use crate::config::CollectorsConfig;
use crate::core::{Collector, CollectorSpec, FindingSource};
use crate::identifier::IdentifierKind;
use std::fmt;
use std::sync::Arc;

/// An ordered, immutable set of registered collectors.
///
/// Registration order is significant: it is the order in which outcomes
/// appear in a report, whatever order the collectors finish in.
#[derive(Clone)]
pub struct RoutingTable {
    collectors: Arc<Vec<Arc<dyn Collector>>>,
}

impl RoutingTable {
    pub fn new(collectors: Vec<Arc<dyn Collector>>) -> Self {
        Self {
            collectors: Arc::new(collectors),
        }
    }

    /// The built-in collectors, configured from `config` and backed by `source`.
    pub fn standard(config: &CollectorsConfig, source: Arc<dyn FindingSource>) -> Self {
        Self::new(standard_collectors(config, source))
    }

    /// The collectors applicable to `kind`, in registration order.
    pub fn select(&self, kind: IdentifierKind) -> Vec<Arc<dyn Collector>> {
        self.collectors
            .iter()
            .filter(|c| c.applicable(kind))
            .cloned()
            .collect()
    }

    /// A table holding only the named collectors, keeping registration order.
    pub fn restrict(&self, names: &[&str]) -> Self {
        Self::new(
            self.collectors
                .iter()
                .filter(|c| names.contains(&c.name()))
                .cloned()
                .collect(),
        )
    }

    pub fn specs(&self) -> impl Iterator<Item = &CollectorSpec> {
        self.collectors.iter().map(|c| c.spec())
    }

    pub fn len(&self) -> usize {
        self.collectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collectors.is_empty()
    }
}

impl fmt::Debug for RoutingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.collectors.iter().map(|c| c.name()))
            .finish()
    }
}
