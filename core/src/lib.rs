//! Telemetry decoding and scan rendering core for the robot monitor platform.
//!
//! Every stage here is a pure function of its inputs: NMEA GGA decoding,
//! lidar scan statistics, polar projection and draw-command emission. The
//! [`pipeline`] module wires them behind swappable source and sink traits so
//! hosts own timing, transport and the actual display surface.

pub mod lidar;
pub mod math;
pub mod nmea;
pub mod pipeline;
pub mod prelude;
pub mod render;
pub mod telemetry;

pub use lidar::{compute_stats, Scan, ScanSample, ScanStats};
pub use math::polar::project;
pub use nmea::{decode, FixStatus, GpsFix, MapMarker};
pub use prelude::{TelemetryError, TelemetryResult};
pub use render::{render, DrawCommand, RenderSurface};
