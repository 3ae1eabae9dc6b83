use crate::lidar::Scan;
use crate::nmea::{GpsFix, MapMarker};
use crate::prelude::{TelemetryError, TelemetryResult};
use crate::render::DrawCommand;

/// Where raw telemetry comes from: a network endpoint, a simulator, a replay.
pub trait TelemetrySource {
    fn fetch_sentence(&mut self) -> TelemetryResult<String>;
    fn fetch_scan(&mut self) -> TelemetryResult<Scan>;
}

/// Consumer of draw commands, typically a canvas adapter.
pub trait DrawSink {
    fn draw(&mut self, commands: &[DrawCommand]);
}

/// Consumer of the decoded fix, typically a map widget adapter.
pub trait MarkerSink {
    fn place(&mut self, fix: &GpsFix, marker: Option<&MapMarker>);
}

/// Source that yields each value at most once; absent values report unavailable.
#[derive(Debug, Clone, Default)]
pub struct OneShotSource {
    sentence: Option<String>,
    scan: Option<Scan>,
}

impl OneShotSource {
    pub fn new(sentence: Option<String>, scan: Option<Scan>) -> Self {
        Self { sentence, scan }
    }
}

impl TelemetrySource for OneShotSource {
    fn fetch_sentence(&mut self) -> TelemetryResult<String> {
        self.sentence
            .take()
            .ok_or_else(|| TelemetryError::SourceUnavailable("no sentence supplied".into()))
    }

    fn fetch_scan(&mut self) -> TelemetryResult<Scan> {
        self.scan
            .take()
            .ok_or_else(|| TelemetryError::SourceUnavailable("no scan supplied".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_source_drains() {
        let mut source = OneShotSource::new(Some("$GNGGA".into()), None);
        assert_eq!(source.fetch_sentence().unwrap(), "$GNGGA");
        assert!(source.fetch_sentence().is_err());
        assert!(matches!(
            source.fetch_scan(),
            Err(TelemetryError::SourceUnavailable(_))
        ));
    }
}
