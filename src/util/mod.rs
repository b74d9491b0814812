pub mod coord;
pub mod error;
pub mod logging;

pub use coord::GeoPoint;
pub use error::RoadTilesError;
pub use logging::init_logging;
