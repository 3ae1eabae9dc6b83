use crate::generator::template::REFERENCE_PROFILE;
use anyhow::ensure;
use chrono::{NaiveTime, Timelike, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use telemcore::lidar::{Scan, ScanSample};
use telemcore::nmea::sentence_checksum;
use telemcore::pipeline::TelemetrySource;
use telemcore::prelude::{TelemetryError, TelemetryResult};

/// Largest position wander, in degrees, the generator accepts.
pub const MAX_POSITION_JITTER_DEG: f64 = 1.0;
/// Largest multiplier applied to the reference ranges.
pub const MAX_RANGE_SCALE: f64 = 1_000.0;

/// Configuration for generating synthetic GNGGA sentences and lidar rotations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub seed: u64,
    pub base_latitude: f64,
    pub base_longitude: f64,
    pub position_jitter_deg: f64,
    pub satellites: u32,
    pub hdop: f32,
    pub altitude_m: f64,
    pub geoid_height_m: f64,
    pub rpm: f64,
    pub rotation_step_deg: f64,
    pub range_jitter_mm: u32,
    pub range_scale: f64,
    pub dropout: f64,
    pub description: Option<String>,
    pub scenario: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            base_latitude: 40.078979,
            base_longitude: 116.236622,
            position_jitter_deg: 0.00002,
            satellites: 28,
            hdop: 0.7,
            altitude_m: 61.0988,
            geoid_height_m: -8.4923,
            rpm: 0.0,
            rotation_step_deg: 1.0,
            range_jitter_mm: 500,
            range_scale: 1.0,
            dropout: 0.0,
            description: None,
            scenario: None,
        }
    }
}

impl GeneratorConfig {
    /// Rejects settings that cannot produce a plausible fix or scan.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.base_latitude.is_finite() && self.base_latitude.abs() <= 90.0,
            "base_latitude {} is outside [-90, 90]",
            self.base_latitude
        );
        ensure!(
            self.base_longitude.is_finite() && self.base_longitude.abs() <= 180.0,
            "base_longitude {} is outside [-180, 180]",
            self.base_longitude
        );
        ensure!(
            self.position_jitter_deg.is_finite()
                && (0.0..=MAX_POSITION_JITTER_DEG).contains(&self.position_jitter_deg),
            "position_jitter_deg {} is outside [0, {}]",
            self.position_jitter_deg,
            MAX_POSITION_JITTER_DEG
        );
        ensure!(
            self.range_scale.is_finite() && (0.0..=MAX_RANGE_SCALE).contains(&self.range_scale),
            "range_scale {} is outside [0, {}]",
            self.range_scale,
            MAX_RANGE_SCALE
        );
        ensure!(
            self.rotation_step_deg.is_finite(),
            "rotation_step_deg must be finite"
        );
        Ok(())
    }

    fn normalized_dropout(&self) -> f64 {
        if self.dropout.is_finite() {
            self.dropout.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// `DDMM.MMMMMMMM` / `DDDMM.MMMMMMMM` plus hemisphere letter.
fn format_coordinate(value: f64, degree_digits: usize, positive: char, negative: char) -> (String, char) {
    let magnitude = value.abs();
    let degrees = magnitude.trunc();
    let minutes = (magnitude - degrees) * 60.0;
    let hemisphere = if value < 0.0 { negative } else { positive };
    (
        format!(
            "{:0width$}{:011.8}",
            degrees as u32,
            minutes,
            width = degree_digits
        ),
        hemisphere,
    )
}

/// Builds a checksummed `$GNGGA` sentence for the given time and position.
pub fn build_gga_sentence(
    config: &GeneratorConfig,
    time: NaiveTime,
    latitude: f64,
    longitude: f64,
) -> String {
    let (lat, lat_dir) = format_coordinate(latitude, 2, 'N', 'S');
    let (lon, lon_dir) = format_coordinate(longitude, 3, 'E', 'W');
    let hundredths = (time.nanosecond() / 10_000_000).min(99);
    let body = format!(
        "$GNGGA,{}.{:02},{},{},{},{},1,{},{:.1},{:.4},M,{:.4},M,,",
        time.format("%H%M%S"),
        hundredths,
        lat,
        lat_dir,
        lon,
        lon_dir,
        config.satellites,
        config.hdop,
        config.altitude_m,
        config.geoid_height_m
    );
    let checksum = sentence_checksum(&body).unwrap_or_default();
    format!("{}*{:02X}", body, checksum)
}

/// Rotates the reference profile by `frame` steps and jitters each valid range.
pub fn build_scan(config: &GeneratorConfig, frame: u64, rng: &mut StdRng, timestamp_ms: u64) -> Scan {
    let offset = frame as f64 * config.rotation_step_deg;
    let jitter = i64::from(config.range_jitter_mm);

    let samples: Vec<ScanSample> = REFERENCE_PROFILE
        .iter()
        .map(|&(angle, range, intensity)| {
            let range_mm = if range == 0 {
                0
            } else {
                let scaled = (f64::from(range) * config.range_scale).round() as i64;
                let noise = if jitter > 0 {
                    rng.gen_range(-jitter..=jitter)
                } else {
                    0
                };
                scaled.saturating_add(noise).clamp(1, i64::from(u32::MAX)) as u32
            };
            ScanSample::new((angle + offset).rem_euclid(360.0), range_mm, intensity)
        })
        .collect();

    Scan {
        sample_count: samples.len(),
        rpm: config.rpm,
        timestamp_ms,
        samples,
        checksum: 0,
    }
}

/// Seeded telemetry source that stands in for the robot's HTTP backend.
pub struct SimulatedSource {
    config: GeneratorConfig,
    rng: StdRng,
    frame: u64,
    last_sentence: Option<String>,
    last_scan: Option<Scan>,
}

impl SimulatedSource {
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            rng,
            frame: 0,
            last_sentence: None,
            last_scan: None,
        }
    }

    /// Replaces the configuration and reseeds; the rotation restarts at frame zero.
    pub fn reconfigure(&mut self, config: GeneratorConfig) {
        *self = Self::new(config);
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn last_sentence(&self) -> Option<&str> {
        self.last_sentence.as_deref()
    }

    pub fn last_scan(&self) -> Option<&Scan> {
        self.last_scan.as_ref()
    }

    fn dropped(&mut self) -> bool {
        let dropout = self.config.normalized_dropout();
        dropout > 0.0 && self.rng.gen_bool(dropout)
    }

    fn jittered(&mut self, base: f64) -> f64 {
        let jitter = self.config.position_jitter_deg.abs();
        if jitter.is_finite() && jitter > 0.0 {
            let jitter = jitter.min(MAX_POSITION_JITTER_DEG);
            base + self.rng.gen_range(-jitter..=jitter)
        } else {
            base
        }
    }
}

impl TelemetrySource for SimulatedSource {
    fn fetch_sentence(&mut self) -> TelemetryResult<String> {
        if self.dropped() {
            return Err(TelemetryError::SourceUnavailable(
                "simulated GPS dropout".into(),
            ));
        }
        let latitude = self.jittered(self.config.base_latitude);
        let longitude = self.jittered(self.config.base_longitude);
        let sentence = build_gga_sentence(&self.config, Utc::now().time(), latitude, longitude);
        self.last_sentence = Some(sentence.clone());
        Ok(sentence)
    }

    fn fetch_scan(&mut self) -> TelemetryResult<Scan> {
        if self.dropped() {
            return Err(TelemetryError::SourceUnavailable(
                "simulated lidar dropout".into(),
            ));
        }
        let timestamp_ms = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        let scan = build_scan(&self.config, self.frame, &mut self.rng, timestamp_ms);
        self.frame += 1;
        self.last_scan = Some(scan.clone());
        Ok(scan)
    }
}
