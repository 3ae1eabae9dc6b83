pub mod polar;
pub mod stats;

pub use polar::{project, PixelPoint, PlanarPoint};
pub use stats::StatsHelper;
