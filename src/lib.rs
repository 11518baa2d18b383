/// Footprint - concurrent OSINT investigations
///
/// This library provides the investigation engine: identifier normalization,
/// the collectors, the budgeted orchestrator and report aggregation, plus the
/// presentation and configuration layers used by the `footprint` binary.
pub mod app;
pub mod cli;
pub mod collectors;
pub mod config;
pub mod core;
pub mod fixtures;
pub mod formatting;
pub mod identifier;
pub mod interactive;
pub mod internal_metrics;
pub mod modules;
pub mod observer;
pub mod orchestrator;
pub mod outputs;
pub mod payload;
pub mod report;
pub mod routing;
pub mod types;

// Re-export core types for convenience
pub use crate::core::*;
pub use identifier::{normalize, normalize_as, Identifier, IdentifierKind, ValidationError};
pub use orchestrator::{investigate, InvestigationError, Orchestrator};
pub use report::{aggregate, OverallStatus, Report};
pub use routing::RoutingTable;
