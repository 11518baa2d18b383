//! Common type aliases used throughout the application.

use tokio::sync::watch;

/// Cancellation signal handed to every collector run.
///
/// The value flips to `true` once the orchestrator abandons the investigation.
pub type CancelSignal = watch::Receiver<bool>;
