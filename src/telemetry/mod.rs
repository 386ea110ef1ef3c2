//! Turn telemetry.
//!
//! # SAFETY INVARIANT
//! Telemetry is a write-only side channel. The workflow never reads it to
//! make a decision.
//!
//! # PRIVACY INVARIANT
//! Events never carry user content: no message text, no field values, no
//! user or client ids. Only turn ids, enums and counts.

pub mod event;
pub mod metrics;
pub mod recorder;

pub use event::{FailureStage, TelemetryEvent, TurnKind, TurnOutcome};
pub use metrics::TelemetrySnapshot;
pub use recorder::TelemetryRecorder;
