use crate::nmea::gga::GpsFix;
use serde::{Deserialize, Serialize};

/// Marker handed to an external map widget for the current position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub latitude: f64,
    pub longitude: f64,
    pub title: String,
    pub callout: String,
}

impl MapMarker {
    /// Builds a marker from a fix with a usable signed position.
    pub fn from_fix(fix: &GpsFix) -> Option<Self> {
        let (latitude, longitude) = fix.signed_position()?;
        Some(Self {
            latitude,
            longitude,
            title: "Current position".into(),
            callout: format!(
                "GPS fix\ntime: {}\nlat/lon: {:.6}, {:.6}",
                fix.time, latitude, longitude
            ),
        })
    }
}
