use crate::lidar::{Scan, ScanStats};
use crate::math::polar::{project, PixelPoint};
use crate::math::stats::StatsHelper;
use crate::render::command::{DrawCommand, Rgba, Stroke};
use crate::render::surface::RenderSurface;

const RING_STROKE: Stroke = Stroke::new(Rgba::new(0, 200, 255, 0.15), 0.8);
const RING_LABEL: Rgba = Rgba::new(100, 255, 218, 0.7);
const CROSSHAIR_STROKE: Stroke = Stroke::new(Rgba::new(0, 200, 255, 0.3), 1.0);
const ORIGIN_COLOR: Rgba = Rgba::new(255, 69, 0, 0.9);
const HEADING_STROKE: Stroke = Stroke::new(Rgba::new(255, 69, 0, 0.8), 2.0);
const CARDINAL_LABEL: Rgba = Rgba::new(100, 255, 218, 0.8);

const ORIGIN_RADIUS_PX: f64 = 4.0;
const HEADING_LENGTH_PX: f64 = 15.0;
const RING_LABEL_SIZE: f32 = 12.0;
const CARDINAL_LABEL_SIZE: f32 = 14.0;
const SUMMARY_SIZE: f32 = 11.0;

/// Colour and radius for one return: near is warm, far is cool, and
/// stronger returns are larger and more opaque. Intensity saturates at 255.
pub fn point_style(range_m: f64, intensity: u16, max_display_range_m: f64) -> (Rgba, f64) {
    let distance_ratio = StatsHelper::unit_ratio(range_m, max_display_range_m);
    let intensity_ratio = StatsHelper::unit_ratio(f64::from(intensity), 255.0);

    let color = Rgba::new(
        (255.0 * (1.0 - distance_ratio)).floor() as u8,
        (100.0 + 100.0 * (1.0 - distance_ratio)).floor() as u8,
        (100.0 + 155.0 * distance_ratio).floor() as u8,
        (0.3 + 0.7 * intensity_ratio) as f32,
    );
    (color, 1.0 + 2.0 * intensity_ratio)
}

/// Emits the full polar view for one scan.
///
/// Returns with no valid range, or that fall outside the surface or beyond
/// `max_display_range_m`, are dropped silently.
pub fn render(scan: &Scan, stats: &ScanStats, surface: &RenderSurface) -> Vec<DrawCommand> {
    let (cx, cy) = surface.center();
    let center = PixelPoint::new(cx, cy);
    let mut commands = vec![DrawCommand::Clear {
        width: surface.width_px,
        height: surface.height_px,
    }];

    for &radius_m in &surface.ring_radii_m {
        let radius_px = radius_m * surface.pixels_per_meter;
        commands.push(DrawCommand::Circle {
            center,
            radius: radius_px,
            stroke: RING_STROKE,
        });
        commands.push(DrawCommand::Text {
            position: PixelPoint::new(cx + radius_px + 5.0, cy - 5.0),
            content: format!("{}m", radius_m),
            size: RING_LABEL_SIZE,
            color: RING_LABEL,
        });
    }

    commands.push(DrawCommand::Line {
        from: PixelPoint::new(0.0, cy),
        to: PixelPoint::new(surface.width_px, cy),
        stroke: CROSSHAIR_STROKE,
    });
    commands.push(DrawCommand::Line {
        from: PixelPoint::new(cx, 0.0),
        to: PixelPoint::new(cx, surface.height_px),
        stroke: CROSSHAIR_STROKE,
    });

    commands.push(DrawCommand::FilledPoint {
        center,
        radius: ORIGIN_RADIUS_PX,
        color: ORIGIN_COLOR,
    });
    commands.push(DrawCommand::Line {
        from: center,
        to: PixelPoint::new(cx, cy - HEADING_LENGTH_PX),
        stroke: HEADING_STROKE,
    });

    for sample in scan.valid_samples() {
        let range_m = f64::from(sample.range_mm) / 1000.0;
        if range_m > surface.max_display_range_m {
            continue;
        }
        let point = project(sample.angle_deg, f64::from(sample.range_mm));
        let draw_x = cx + point.x * surface.pixels_per_meter;
        let draw_y = cy + point.y * surface.pixels_per_meter;
        if !surface.contains(draw_x, draw_y) {
            continue;
        }
        let (color, radius) = point_style(range_m, sample.intensity, surface.max_display_range_m);
        commands.push(DrawCommand::FilledPoint {
            center: PixelPoint::new(draw_x, draw_y),
            radius,
            color,
        });
    }

    let cardinals = [
        ("N", cx - 6.0, 20.0),
        ("S", cx - 6.0, surface.height_px - 10.0),
        ("W", 10.0, cy + 6.0),
        ("E", surface.width_px - 20.0, cy + 6.0),
    ];
    for (label, x, y) in cardinals {
        commands.push(DrawCommand::Text {
            position: PixelPoint::new(x, y),
            content: label.to_string(),
            size: CARDINAL_LABEL_SIZE,
            color: CARDINAL_LABEL,
        });
    }

    if surface.show_summary {
        commands.push(DrawCommand::Text {
            position: PixelPoint::new(10.0, surface.height_px - 10.0),
            content: format!(
                "{} pts | {}-{} mm | {}",
                stats.valid_sample_count,
                stats.min_range_mm,
                stats.max_range_mm,
                stats.formatted_timestamp
            ),
            size: SUMMARY_SIZE,
            color: RING_LABEL,
        });
    }

    commands
}
