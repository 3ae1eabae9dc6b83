use crate::math::polar::PixelPoint;
use serde::{Deserialize, Serialize};

/// 8-bit colour channels with a fractional alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f64,
}

impl Stroke {
    pub const fn new(color: Rgba, width: f64) -> Self {
        Self { color, width }
    }
}

/// Drawing primitive in surface pixels. Hosts replay these in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear {
        width: f64,
        height: f64,
    },
    Circle {
        center: PixelPoint,
        radius: f64,
        stroke: Stroke,
    },
    Line {
        from: PixelPoint,
        to: PixelPoint,
        stroke: Stroke,
    },
    FilledPoint {
        center: PixelPoint,
        radius: f64,
        color: Rgba,
    },
    Text {
        position: PixelPoint,
        content: String,
        size: f32,
        color: Rgba,
    },
}

impl DrawCommand {
    pub fn is_filled_point(&self) -> bool {
        matches!(self, DrawCommand::FilledPoint { .. })
    }
}
