pub mod point;
pub mod record;
pub mod way;

pub use point::GeoPoint;
pub use record::{FieldPoint, RoadPointRecord};
pub use way::Way;
