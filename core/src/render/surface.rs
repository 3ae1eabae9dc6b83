use crate::prelude::{TelemetryError, TelemetryResult};
use serde::{Deserialize, Serialize};

/// Target surface geometry for [`render`](crate::render::render).
///
/// `pixels_per_meter` is the projection scale: planar meters are multiplied
/// by it to obtain pixel offsets from the surface center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSurface {
    pub width_px: f64,
    pub height_px: f64,
    pub pixels_per_meter: f64,
    pub max_display_range_m: f64,
    pub ring_radii_m: Vec<f64>,
    pub show_summary: bool,
}

impl Default for RenderSurface {
    fn default() -> Self {
        Self {
            width_px: 300.0,
            height_px: 300.0,
            pixels_per_meter: 50.0,
            max_display_range_m: 100.0,
            ring_radii_m: vec![1.0, 2.0, 3.0, 4.0, 5.0],
            show_summary: false,
        }
    }
}

impl RenderSurface {
    pub fn new(width_px: f64, height_px: f64, pixels_per_meter: f64, max_display_range_m: f64) -> Self {
        Self {
            width_px,
            height_px,
            pixels_per_meter,
            max_display_range_m,
            ..Default::default()
        }
    }

    pub fn with_rings(mut self, ring_radii_m: Vec<f64>) -> Self {
        self.ring_radii_m = ring_radii_m;
        self
    }

    pub fn with_summary(mut self, show_summary: bool) -> Self {
        self.show_summary = show_summary;
        self
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width_px / 2.0, self.height_px / 2.0)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        (0.0..=self.width_px).contains(&x) && (0.0..=self.height_px).contains(&y)
    }

    pub fn validate(&self) -> TelemetryResult<()> {
        let checks = [
            ("width_px", self.width_px),
            ("height_px", self.height_px),
            ("pixels_per_meter", self.pixels_per_meter),
            ("max_display_range_m", self.max_display_range_m),
        ];
        for (name, value) in checks {
            if !value.is_finite() || value <= 0.0 {
                return Err(TelemetryError::InvalidSurface(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if let Some(radius) = self
            .ring_radii_m
            .iter()
            .find(|radius| !radius.is_finite() || **radius <= 0.0)
        {
            return Err(TelemetryError::InvalidSurface(format!(
                "ring radius must be positive, got {}",
                radius
            )));
        }
        Ok(())
    }
}
