//! Lidar scan records and their per-rotation summary.

pub mod scan;
pub mod stats;

pub use scan::{Scan, ScanSample};
pub use stats::{compute_stats, compute_stats_at, format_timestamp, ScanStats};
