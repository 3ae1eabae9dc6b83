use crate::prelude::{TelemetryError, TelemetryResult};
use serde::{Deserialize, Serialize};

/// One lidar return. A `range_mm` of zero means the sensor saw nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanSample {
    #[serde(rename = "angle")]
    pub angle_deg: f64,
    #[serde(rename = "distance_mm")]
    pub range_mm: u32,
    #[serde(default)]
    pub intensity: u16,
}

impl ScanSample {
    pub fn new(angle_deg: f64, range_mm: u32, intensity: u16) -> Self {
        Self {
            angle_deg,
            range_mm,
            intensity,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.range_mm > 0
    }
}

/// A full rotation as published by the telemetry backend.
///
/// Samples are kept in acquisition order; nothing downstream assumes the
/// angles are sorted or normalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scan {
    #[serde(rename = "N")]
    pub sample_count: usize,
    pub rpm: f64,
    #[serde(rename = "timestamp")]
    pub timestamp_ms: u64,
    #[serde(rename = "points")]
    pub samples: Vec<ScanSample>,
    #[serde(rename = "crc")]
    pub checksum: u32,
}

impl Scan {
    pub fn from_samples(samples: Vec<ScanSample>, timestamp_ms: u64) -> Self {
        Self {
            sample_count: samples.len(),
            rpm: 0.0,
            timestamp_ms,
            samples,
            checksum: 0,
        }
    }

    pub fn from_json(payload: &str) -> TelemetryResult<Self> {
        serde_json::from_str(payload).map_err(|err| TelemetryError::InvalidPayload(err.to_string()))
    }

    pub fn valid_samples(&self) -> impl Iterator<Item = &ScanSample> {
        self.samples.iter().filter(|sample| sample.is_valid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_wire_format() {
        let payload = r#"{
            "N": 3,
            "rpm": 0,
            "timestamp": 1700000000123,
            "points": [
                {"angle": 0.0, "distance_mm": 0, "intensity": 0},
                {"angle": 22.5, "distance_mm": 43520, "intensity": 85},
                {"angle": 45.0, "distance_mm": 257, "intensity": 153}
            ],
            "crc": 0
        }"#;
        let scan = Scan::from_json(payload).unwrap();
        assert_eq!(scan.sample_count, 3);
        assert_eq!(scan.timestamp_ms, 1_700_000_000_123);
        assert_eq!(scan.samples[1], ScanSample::new(22.5, 43520, 85));
        assert_eq!(scan.valid_samples().count(), 2);
    }

    #[test]
    fn missing_fields_default() {
        let scan = Scan::from_json(r#"{"points": [{"angle": 90.0, "distance_mm": 10}]}"#).unwrap();
        assert_eq!(scan.sample_count, 0);
        assert_eq!(scan.samples[0].intensity, 0);
    }

    #[test]
    fn intensity_above_byte_range_is_kept() {
        let scan = Scan::from_json(
            r#"{"points": [{"angle": 45.0, "distance_mm": 257, "intensity": 4000}]}"#,
        )
        .unwrap();
        assert_eq!(scan.samples[0].intensity, 4000);
        assert_eq!(scan.valid_samples().count(), 1);
    }

    #[test]
    fn malformed_payload_is_reported() {
        let err = Scan::from_json("{\"points\": 7}").unwrap_err();
        assert!(matches!(err, TelemetryError::InvalidPayload(_)));
    }
}
