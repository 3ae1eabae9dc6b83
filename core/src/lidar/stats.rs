use crate::lidar::scan::ScanSample;
use crate::math::stats::StatsHelper;
use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

/// Timestamps above this look like a real millisecond epoch.
pub const EPOCH_MS_THRESHOLD: u64 = 1_000_000_000_000;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Summary of one rotation, recomputed on every update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub valid_sample_count: usize,
    pub max_range_mm: u32,
    pub min_range_mm: u32,
    pub formatted_timestamp: String,
}

/// Summarizes `samples`, formatting `timestamp_ms` against the current local clock.
pub fn compute_stats(samples: &[ScanSample], timestamp_ms: u64) -> ScanStats {
    compute_stats_at(samples, timestamp_ms, Local::now())
}

/// Same as [`compute_stats`] with an explicit fallback clock.
pub fn compute_stats_at(samples: &[ScanSample], timestamp_ms: u64, now: DateTime<Local>) -> ScanStats {
    let valid: Vec<u32> = samples
        .iter()
        .filter(|sample| sample.is_valid())
        .map(|sample| sample.range_mm)
        .collect();
    let (min_range_mm, max_range_mm) = StatsHelper::extent(valid.iter().copied()).unwrap_or((0, 0));

    ScanStats {
        valid_sample_count: valid.len(),
        max_range_mm,
        min_range_mm,
        formatted_timestamp: format_timestamp(timestamp_ms, now),
    }
}

/// `YYYY-MM-DD HH:MM:SS.mmm` in local time.
///
/// Placeholder timestamps (not above [`EPOCH_MS_THRESHOLD`]) and values chrono
/// cannot represent are replaced by `now`.
pub fn format_timestamp(timestamp_ms: u64, now: DateTime<Local>) -> String {
    let date = if timestamp_ms > EPOCH_MS_THRESHOLD {
        i64::try_from(timestamp_ms)
            .ok()
            .and_then(|millis| Local.timestamp_millis_opt(millis).single())
            .unwrap_or(now)
    } else {
        now
    };
    date.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(ranges: &[u32]) -> Vec<ScanSample> {
        ranges
            .iter()
            .enumerate()
            .map(|(idx, &range)| ScanSample::new(idx as f64 * 22.5, range, 100))
            .collect()
    }

    fn fixed_now() -> DateTime<Local> {
        Local.timestamp_millis_opt(1_600_000_000_000).single().unwrap()
    }

    #[test]
    fn all_invalid_samples_yield_zeroes() {
        let stats = compute_stats_at(&samples(&[0, 0]), 0, fixed_now());
        assert_eq!(stats.valid_sample_count, 0);
        assert_eq!(stats.max_range_mm, 0);
        assert_eq!(stats.min_range_mm, 0);
    }

    #[test]
    fn empty_scan_yields_zeroes() {
        let stats = compute_stats_at(&[], 0, fixed_now());
        assert_eq!(stats.valid_sample_count, 0);
        assert_eq!(stats.min_range_mm, 0);
    }

    #[test]
    fn extent_ignores_missing_returns() {
        let stats = compute_stats_at(&samples(&[500, 1500, 0]), 0, fixed_now());
        assert_eq!(stats.valid_sample_count, 2);
        assert_eq!(stats.max_range_mm, 1500);
        assert_eq!(stats.min_range_mm, 500);
    }

    #[test]
    fn epoch_timestamp_is_formatted_in_local_time() {
        let timestamp = 1_700_000_000_123u64;
        let expected = Local
            .timestamp_millis_opt(timestamp as i64)
            .single()
            .unwrap()
            .format("%Y-%m-%d %H:%M:%S%.3f")
            .to_string();
        let stats = compute_stats_at(&[], timestamp, fixed_now());
        assert_eq!(stats.formatted_timestamp, expected);
        assert!(stats.formatted_timestamp.ends_with(".123"));
    }

    #[test]
    fn placeholder_timestamp_falls_back_to_clock() {
        let expected = fixed_now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();
        assert_eq!(format_timestamp(12_345, fixed_now()), expected);
        assert_eq!(format_timestamp(EPOCH_MS_THRESHOLD, fixed_now()), expected);
        assert_eq!(format_timestamp(u64::MAX, fixed_now()), expected);
    }

    #[test]
    fn formatted_shape_matches_calendar_layout() {
        let text = format_timestamp(0, fixed_now());
        assert_eq!(text.len(), "YYYY-MM-DD HH:MM:SS.mmm".len());
        assert_eq!(&text[4..5], "-");
        assert_eq!(&text[10..11], " ");
        assert_eq!(&text[19..20], ".");
    }

    #[test]
    fn repeated_calls_with_same_clock_match() {
        let input = samples(&[500, 1500, 0]);
        assert_eq!(
            compute_stats_at(&input, 1_700_000_000_000, fixed_now()),
            compute_stats_at(&input, 1_700_000_000_000, fixed_now())
        );
    }
}
