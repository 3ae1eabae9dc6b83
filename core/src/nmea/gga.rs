use serde::{Deserialize, Serialize};

/// Sentence identifier accepted by [`decode`]; anything else passes the previous fix through.
pub const GGA_SENTENCE_ID: &str = "$GNGGA";

const TIME_FIELD: usize = 1;
const LATITUDE_FIELD: usize = 2;
const LAT_DIR_FIELD: usize = 3;
const LONGITUDE_FIELD: usize = 4;
const LON_DIR_FIELD: usize = 5;
const STATUS_FIELD: usize = 6;
const SATELLITES_FIELD: usize = 7;
const HDOP_FIELD: usize = 8;
const ALTITUDE_FIELD: usize = 9;
const GEOID_HEIGHT_FIELD: usize = 11;

/// Fix quality reduced to the three states the monitor displays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FixStatus {
    Fix,
    NoFix,
    #[default]
    Unknown,
}

impl FixStatus {
    fn from_field(field: &str) -> Self {
        match field {
            "1" => FixStatus::Fix,
            "0" => FixStatus::NoFix,
            _ => FixStatus::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FixStatus::Fix => "fix",
            FixStatus::NoFix => "no-fix",
            FixStatus::Unknown => "unknown",
        }
    }
}

/// Decoded GGA fix. Text fields are empty when the sentence omitted them.
///
/// `latitude` and `longitude` carry the unsigned magnitude in decimal degrees
/// with six fractional digits; the hemisphere stays in `lat_dir`/`lon_dir`.
/// Use [`GpsFix::signed_position`] for a signed coordinate pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GpsFix {
    pub time: String,
    pub latitude: String,
    pub lat_dir: String,
    pub longitude: String,
    pub lon_dir: String,
    pub status: FixStatus,
    pub satellites_in_view: String,
    pub horizontal_dilution: String,
    pub altitude: String,
    pub geoid_height: String,
}

impl GpsFix {
    /// Signed decimal degrees, with `S` and `W` folded into a negative sign.
    ///
    /// Returns `None` when either coordinate is missing, unparsable or zero.
    pub fn signed_position(&self) -> Option<(f64, f64)> {
        let latitude = parse_magnitude(&self.latitude)?;
        let longitude = parse_magnitude(&self.longitude)?;
        Some((
            apply_hemisphere(latitude, &self.lat_dir, "S"),
            apply_hemisphere(longitude, &self.lon_dir, "W"),
        ))
    }

    pub fn has_position(&self) -> bool {
        self.signed_position().is_some()
    }
}

fn parse_magnitude(field: &str) -> Option<f64> {
    let value = field.parse::<f64>().ok()?;
    (value.is_finite() && value != 0.0).then_some(value)
}

fn apply_hemisphere(value: f64, direction: &str, negative: &str) -> f64 {
    if direction.eq_ignore_ascii_case(negative) {
        -value
    } else {
        value
    }
}

/// Decodes one `$GNGGA` sentence.
///
/// Never fails: a sentence with a different identifier yields `previous`
/// unchanged, missing trailing fields become empty strings, and coordinates
/// that do not parse are left empty rather than zeroed.
pub fn decode(raw: &str, previous: &GpsFix) -> GpsFix {
    let fields: Vec<&str> = raw.trim_end_matches(['\r', '\n']).split(',').collect();
    if fields.first().copied() != Some(GGA_SENTENCE_ID) {
        return previous.clone();
    }

    let field = |index: usize| fields.get(index).copied().unwrap_or("");

    GpsFix {
        time: parse_time(field(TIME_FIELD)),
        latitude: parse_coordinate(field(LATITUDE_FIELD), 2),
        lat_dir: field(LAT_DIR_FIELD).to_string(),
        longitude: parse_coordinate(field(LONGITUDE_FIELD), 3),
        lon_dir: field(LON_DIR_FIELD).to_string(),
        status: FixStatus::from_field(field(STATUS_FIELD)),
        satellites_in_view: field(SATELLITES_FIELD).to_string(),
        horizontal_dilution: field(HDOP_FIELD).to_string(),
        altitude: field(ALTITUDE_FIELD).to_string(),
        geoid_height: field(GEOID_HEIGHT_FIELD).to_string(),
    }
}

/// `HHMMSS[.ss]` to `HH:MM:SS`; fractional seconds are dropped.
fn parse_time(field: &str) -> String {
    if field.len() < 6 {
        return String::new();
    }
    match (field.get(0..2), field.get(2..4), field.get(4..6)) {
        (Some(hh), Some(mm), Some(ss)) => format!("{hh}:{mm}:{ss}"),
        _ => String::new(),
    }
}

/// `D..DMM.MMMM` to decimal degrees with six fractional digits.
fn parse_coordinate(field: &str, degree_digits: usize) -> String {
    if field.is_empty() {
        return String::new();
    }
    let (Some(degrees), Some(minutes)) = (field.get(..degree_digits), field.get(degree_digits..))
    else {
        return String::new();
    };
    let (Ok(degrees), Ok(minutes)) = (degrees.parse::<u32>(), minutes.parse::<f64>()) else {
        return String::new();
    };
    if !minutes.is_finite() {
        return String::new();
    }
    format!("{:.6}", degrees as f64 + minutes / 60.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &str =
        "$GNGGA,023634.00,4004.73871635,N,11614.19729418,E,1,28,0.7,61.0988,M,-8.4923,M,,*58";

    fn sample_previous() -> GpsFix {
        GpsFix {
            time: "11:22:33".into(),
            latitude: "12.500000".into(),
            lat_dir: "S".into(),
            status: FixStatus::Fix,
            ..Default::default()
        }
    }

    #[test]
    fn decodes_reference_sentence() {
        let fix = decode(REFERENCE, &GpsFix::default());
        assert_eq!(fix.time, "02:36:34");
        assert_eq!(fix.status, FixStatus::Fix);
        assert_eq!(fix.latitude, "40.078979");
        assert_eq!(fix.longitude, "116.236622");
        assert_eq!(fix.lat_dir, "N");
        assert_eq!(fix.lon_dir, "E");
        assert_eq!(fix.satellites_in_view, "28");
        assert_eq!(fix.horizontal_dilution, "0.7");
        assert_eq!(fix.altitude, "61.0988");
        assert_eq!(fix.geoid_height, "-8.4923");
    }

    #[test]
    fn other_sentence_ids_pass_previous_through() {
        let previous = sample_previous();
        let fix = decode("$GNGLL,4004.73871635,N,11614.19729418,E,023634.00,A,A*7C", &previous);
        assert_eq!(fix, previous);
        assert_eq!(decode("", &previous), previous);
        assert_eq!(decode("$GPGGA,023634.00", &previous), previous);
    }

    #[test]
    fn truncated_sentence_leaves_missing_fields_empty() {
        let fix = decode("$GNGGA,023634.00,4004.5", &sample_previous());
        assert_eq!(fix.time, "02:36:34");
        assert_eq!(fix.latitude, "40.075000");
        assert_eq!(fix.longitude, "");
        assert_eq!(fix.lat_dir, "");
        assert_eq!(fix.status, FixStatus::Unknown);
        assert_eq!(fix.geoid_height, "");

        let bare = decode("$GNGGA", &sample_previous());
        assert_eq!(bare, GpsFix::default());
    }

    #[test]
    fn short_or_odd_time_is_empty() {
        assert_eq!(decode("$GNGGA,0236", &GpsFix::default()).time, "");
        assert_eq!(decode("$GNGGA,0é2634", &GpsFix::default()).time, "");
    }

    #[test]
    fn unparsable_coordinates_stay_empty_not_zero() {
        let fix = decode("$GNGGA,023634.00,ab04.7,N,1161x.1,E,0", &GpsFix::default());
        assert_eq!(fix.latitude, "");
        assert_eq!(fix.longitude, "");
        assert_eq!(fix.status, FixStatus::NoFix);

        let short = decode("$GNGGA,023634.00,4,N,11,E,2", &GpsFix::default());
        assert_eq!(short.latitude, "");
        assert_eq!(short.longitude, "");
        assert_eq!(short.status, FixStatus::Unknown);
    }

    #[test]
    fn trailing_line_ending_is_ignored() {
        let fix = decode(&format!("{REFERENCE}\r\n"), &GpsFix::default());
        assert_eq!(fix.latitude, "40.078979");
    }

    #[test]
    fn signed_position_folds_hemisphere() {
        let fix = decode(
            "$GNGGA,023634.00,3351.00000000,S,15112.00000000,W,1,10,0.9,5.0,M,0.0,M,,",
            &GpsFix::default(),
        );
        let (lat, lon) = fix.signed_position().unwrap();
        assert!((lat + 33.85).abs() < 1e-9);
        assert!((lon + 151.2).abs() < 1e-9);
        assert_eq!(fix.latitude, "33.850000");
    }

    #[test]
    fn signed_position_requires_both_coordinates() {
        assert!(GpsFix::default().signed_position().is_none());
        let fix = GpsFix {
            latitude: "40.0".into(),
            longitude: "0.000000".into(),
            ..Default::default()
        };
        assert!(!fix.has_position());
    }

    #[test]
    fn decoding_is_repeatable() {
        let previous = sample_previous();
        assert_eq!(decode(REFERENCE, &previous), decode(REFERENCE, &previous));
    }
}
