use crate::lidar::{compute_stats, Scan, ScanStats};
use crate::nmea::{decode, GpsFix, MapMarker};
use crate::pipeline::seams::{DrawSink, MarkerSink, TelemetrySource};
use crate::prelude::TelemetryResult;
use crate::render::{render, DrawCommand, RenderSurface};
use crate::telemetry::{LogManager, Metrics, MetricsRecorder};
use serde::{Deserialize, Serialize};

/// Everything one tick produces for the display collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryFrame {
    pub fix: GpsFix,
    pub marker: Option<MapMarker>,
    pub stats: ScanStats,
    pub commands: Vec<DrawCommand>,
    pub sentence_fresh: bool,
    pub scan_fresh: bool,
}

impl TelemetryFrame {
    pub fn publish(&self, draw: &mut dyn DrawSink, markers: &mut dyn MarkerSink) {
        draw.draw(&self.commands);
        markers.place(&self.fix, self.marker.as_ref());
    }
}

pub struct TelemetryPipeline {
    surface: RenderSurface,
    last_fix: GpsFix,
    last_scan: Option<Scan>,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl TelemetryPipeline {
    pub fn new(surface: RenderSurface) -> TelemetryResult<Self> {
        surface.validate()?;
        Ok(Self {
            surface,
            last_fix: GpsFix::default(),
            last_scan: None,
            logger: LogManager::with_target("telemcore::pipeline"),
            metrics: MetricsRecorder::new(),
        })
    }

    /// Fetches, decodes and renders one update.
    ///
    /// A failed fetch is logged and counted, then the previous fix or scan
    /// stands in for it. Before the first scan arrives an empty scan is drawn.
    pub fn tick<S>(&mut self, source: &mut S) -> TelemetryFrame
    where
        S: TelemetrySource + ?Sized,
    {
        self.metrics.record_tick();

        let sentence_fresh = match source.fetch_sentence() {
            Ok(raw) => {
                self.last_fix = decode(&raw, &self.last_fix);
                true
            }
            Err(err) => {
                self.metrics.record_sentence_failure();
                self.logger
                    .warn(&format!("sentence fetch failed, keeping previous fix: {}", err));
                false
            }
        };

        let scan_fresh = match source.fetch_scan() {
            Ok(scan) => {
                self.last_scan = Some(scan);
                true
            }
            Err(err) => {
                self.metrics.record_scan_failure();
                self.logger
                    .warn(&format!("scan fetch failed, reusing previous scan: {}", err));
                false
            }
        };

        let (stats, commands) = self.draw_latest();
        self.logger.detail(&format!(
            "tick rendered {} commands from {} valid samples",
            commands.len(),
            stats.valid_sample_count
        ));

        TelemetryFrame {
            marker: MapMarker::from_fix(&self.last_fix),
            fix: self.last_fix.clone(),
            stats,
            commands,
            sentence_fresh,
            scan_fresh,
        }
    }

    /// Switches to a new surface and re-renders the most recent scan, if any.
    pub fn resize(&mut self, surface: RenderSurface) -> TelemetryResult<Option<Vec<DrawCommand>>> {
        surface.validate()?;
        self.logger.record(&format!(
            "surface resized to {}x{} px",
            surface.width_px, surface.height_px
        ));
        self.surface = surface;
        if self.last_scan.is_none() {
            return Ok(None);
        }
        let (_, commands) = self.draw_latest();
        Ok(Some(commands))
    }

    fn draw_latest(&self) -> (ScanStats, Vec<DrawCommand>) {
        let empty = Scan::default();
        let scan = self.last_scan.as_ref().unwrap_or(&empty);
        let stats = compute_stats(&scan.samples, scan.timestamp_ms);
        let commands = render(scan, &stats, &self.surface);
        (stats, commands)
    }

    pub fn last_fix(&self) -> &GpsFix {
        &self.last_fix
    }

    pub fn last_scan(&self) -> Option<&Scan> {
        self.last_scan.as_ref()
    }

    pub fn surface(&self) -> &RenderSurface {
        &self.surface
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lidar::ScanSample;
    use crate::nmea::FixStatus;
    use crate::prelude::{TelemetryError, TelemetryResult};
    use std::collections::VecDeque;

    const REFERENCE: &str =
        "$GNGGA,023634.00,4004.73871635,N,11614.19729418,E,1,28,0.7,61.0988,M,-8.4923,M,,*58";

    #[derive(Default)]
    struct ScriptedSource {
        sentences: VecDeque<TelemetryResult<String>>,
        scans: VecDeque<TelemetryResult<Scan>>,
    }

    impl TelemetrySource for ScriptedSource {
        fn fetch_sentence(&mut self) -> TelemetryResult<String> {
            self.sentences
                .pop_front()
                .unwrap_or_else(|| Err(TelemetryError::SourceUnavailable("drained".into())))
        }

        fn fetch_scan(&mut self) -> TelemetryResult<Scan> {
            self.scans
                .pop_front()
                .unwrap_or_else(|| Err(TelemetryError::SourceUnavailable("drained".into())))
        }
    }

    #[derive(Default)]
    struct Recorder {
        drawn: usize,
        markers: Vec<Option<MapMarker>>,
    }

    impl DrawSink for Recorder {
        fn draw(&mut self, commands: &[DrawCommand]) {
            self.drawn += commands.len();
        }
    }

    impl MarkerSink for Recorder {
        fn place(&mut self, _fix: &GpsFix, marker: Option<&MapMarker>) {
            self.markers.push(marker.cloned());
        }
    }

    fn near_scan() -> Scan {
        Scan::from_samples(
            vec![
                ScanSample::new(0.0, 1000, 200),
                ScanSample::new(90.0, 0, 0),
                ScanSample::new(180.0, 2000, 50),
            ],
            1_700_000_000_000,
        )
    }

    fn point_count(frame: &TelemetryFrame) -> usize {
        frame.commands.iter().filter(|c| c.is_filled_point()).count()
    }

    #[test]
    fn rejects_invalid_surface() {
        let surface = RenderSurface::new(-1.0, 300.0, 50.0, 100.0);
        assert!(TelemetryPipeline::new(surface).is_err());
    }

    #[test]
    fn tick_decodes_and_renders() {
        let mut pipeline = TelemetryPipeline::new(RenderSurface::default()).unwrap();
        let mut source = ScriptedSource::default();
        source.sentences.push_back(Ok(REFERENCE.into()));
        source.scans.push_back(Ok(near_scan()));

        let frame = pipeline.tick(&mut source);
        assert!(frame.sentence_fresh && frame.scan_fresh);
        assert_eq!(frame.fix.status, FixStatus::Fix);
        assert!(frame.marker.is_some());
        assert_eq!(frame.stats.valid_sample_count, 2);
        assert_eq!(point_count(&frame), 3);
    }

    #[test]
    fn failed_fetches_fall_back_to_previous_values() {
        let mut pipeline = TelemetryPipeline::new(RenderSurface::default()).unwrap();
        let mut source = ScriptedSource::default();
        source.sentences.push_back(Ok(REFERENCE.into()));
        source.scans.push_back(Ok(near_scan()));
        let first = pipeline.tick(&mut source);

        let second = pipeline.tick(&mut source);
        assert!(!second.sentence_fresh && !second.scan_fresh);
        assert_eq!(second.fix, first.fix);
        assert_eq!(second.commands, first.commands);

        let metrics = pipeline.metrics();
        assert_eq!(metrics.ticks, 2);
        assert_eq!(metrics.sentence_failures, 1);
        assert_eq!(metrics.scan_failures, 1);
    }

    #[test]
    fn wrong_sentence_keeps_previous_fix() {
        let mut pipeline = TelemetryPipeline::new(RenderSurface::default()).unwrap();
        let mut source = ScriptedSource::default();
        source.sentences.push_back(Ok(REFERENCE.into()));
        source.sentences.push_back(Ok("$GNRMC,023634.00,A".into()));
        let first = pipeline.tick(&mut source);
        let second = pipeline.tick(&mut source);
        assert!(second.sentence_fresh);
        assert_eq!(second.fix, first.fix);
    }

    #[test]
    fn empty_background_before_first_scan() {
        let mut pipeline = TelemetryPipeline::new(RenderSurface::default()).unwrap();
        let frame = pipeline.tick(&mut ScriptedSource::default());
        assert_eq!(frame.stats.valid_sample_count, 0);
        assert_eq!(point_count(&frame), 1);
        assert!(frame.marker.is_none());
        assert_eq!(frame.fix, GpsFix::default());
    }

    #[test]
    fn resize_redraws_latest_scan() {
        let mut pipeline = TelemetryPipeline::new(RenderSurface::default()).unwrap();
        assert!(pipeline
            .resize(RenderSurface::new(600.0, 600.0, 50.0, 100.0))
            .unwrap()
            .is_none());

        let mut source = ScriptedSource::default();
        source.scans.push_back(Ok(near_scan()));
        pipeline.tick(&mut source);

        let commands = pipeline
            .resize(RenderSurface::new(600.0, 600.0, 50.0, 100.0))
            .unwrap()
            .unwrap();
        assert!(matches!(commands[0], DrawCommand::Clear { width, .. } if width == 600.0));
        assert!(pipeline.resize(RenderSurface::new(0.0, 1.0, 1.0, 1.0)).is_err());
        assert_eq!(pipeline.surface().width_px, 600.0);
    }

    #[test]
    fn publish_feeds_both_sinks() {
        let mut pipeline = TelemetryPipeline::new(RenderSurface::default()).unwrap();
        let mut source = ScriptedSource::default();
        source.sentences.push_back(Ok(REFERENCE.into()));
        let frame = pipeline.tick(&mut source);

        let mut draw = Recorder::default();
        let mut markers = Recorder::default();
        frame.publish(&mut draw, &mut markers);
        assert_eq!(draw.drawn, frame.commands.len());
        assert_eq!(markers.markers.len(), 1);
        assert!(markers.markers[0].is_some());
    }
}
