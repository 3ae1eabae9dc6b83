use serde::{Deserialize, Serialize};
use telemcore::lidar::ScanStats;
use telemcore::nmea::{GpsFix, MapMarker};
use telemcore::pipeline::{DrawSink, MarkerSink};
use telemcore::render::DrawCommand;

/// Map-widget half of the published model.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MapLayer {
    pub fix: GpsFix,
    pub marker: Option<MapMarker>,
}

impl MarkerSink for MapLayer {
    fn place(&mut self, fix: &GpsFix, marker: Option<&MapMarker>) {
        self.fix = fix.clone();
        self.marker = marker.cloned();
    }
}

/// Canvas half of the published model.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CanvasLayer {
    pub commands: Vec<DrawCommand>,
}

impl DrawSink for CanvasLayer {
    fn draw(&mut self, commands: &[DrawCommand]) {
        self.commands = commands.to_vec();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VisualizationModel {
    pub map: MapLayer,
    pub canvas: CanvasLayer,
    pub stats: ScanStats,
    pub notes: Vec<String>,
}
