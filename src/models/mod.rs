//! Data models for the dashboard
//!
//! Wire payloads from the signal endpoint and the local chart/display state
//! they are reconciled into.

pub mod chart;
pub mod signal;
pub mod snapshot;

// Re-export commonly used types for convenience
pub use chart::{ChartPhase, Dataset, EmaRetention, LineChart};
pub use signal::{SignalClass, SignalDisplay};
pub use snapshot::Snapshot;
