//! Collaborator contracts the simulation loop feeds: append-only sinks and the viewer.

pub mod sinks;
pub mod viewer;

pub use sinks::{DiagnosticsSink, TrajectorySink, TsvDiagnosticsWriter, TsvTrajectoryWriter};
pub use viewer::{BodyTag, Sprite, ViewFrame, Viewer};
