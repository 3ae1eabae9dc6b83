//! Fetch → decode → render wiring behind swappable collaborators.
//!
//! The pipeline holds the only cross-tick memory in the crate: the most
//! recent fix (decoder fallback) and the most recent scan (redraw on resize
//! or on a failed fetch). Scheduling and cancellation belong to the host.

pub mod seams;
pub mod tick;

pub use seams::{DrawSink, MarkerSink, OneShotSource, TelemetrySource};
pub use tick::{TelemetryFrame, TelemetryPipeline};
