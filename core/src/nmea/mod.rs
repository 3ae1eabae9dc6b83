//! NMEA 0183 GGA decoding and the map-marker view of a decoded fix.

pub mod checksum;
pub mod gga;
pub mod marker;

pub use checksum::{checksum_matches, sentence_checksum};
pub use gga::{decode, FixStatus, GpsFix, GGA_SENTENCE_ID};
pub use marker::MapMarker;
