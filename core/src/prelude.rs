pub use crate::lidar::{Scan, ScanSample, ScanStats};
pub use crate::math::polar::{PixelPoint, PlanarPoint};
pub use crate::nmea::{FixStatus, GpsFix, MapMarker};
pub use crate::pipeline::{DrawSink, MarkerSink, TelemetryFrame, TelemetryPipeline, TelemetrySource};
pub use crate::render::{DrawCommand, RenderSurface, Rgba, Stroke};

/// Error type for the seams around the pure core: sources, payloads and surfaces.
///
/// The decoding and rendering functions themselves never fail; they degrade
/// to defined defaults instead.
#[derive(thiserror::Error, Debug)]
pub enum TelemetryError {
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("invalid surface: {0}")]
    InvalidSurface(String),
}

pub type TelemetryResult<T> = Result<T, TelemetryError>;
