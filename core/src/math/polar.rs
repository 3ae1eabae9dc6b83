use serde::{Deserialize, Serialize};

/// Planar point in meters, in the sensor-centered frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

/// Screen-space point in pixels, origin at the top-left of the surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Converts a polar lidar return into planar meters.
///
/// No heading offset or wrap is applied: the angle convention is whatever
/// the sensor reports. Any numeric input is accepted, including negative or
/// out-of-range angles.
pub fn project(angle_deg: f64, range_mm: f64) -> PlanarPoint {
    let rad = angle_deg * std::f64::consts::PI / 180.0;
    let range_m = range_mm / 1000.0;
    PlanarPoint {
        x: range_m * rad.cos(),
        y: range_m * rad.sin(),
    }
}
