use super::GeoPoint;

/// A point offset perpendicularly from a road point, representing a location
/// beside the road (e.g., for imagery sampling)
#[derive(Debug, Clone, Copy)]
pub struct FieldPoint {
    /// The projected location
    pub point: GeoPoint,
    /// Offset direction used for the projection, degrees clockwise from north
    pub bearing: f64,
    /// The road point this was projected from
    pub road: GeoPoint,
}

/// One output row: a road point, the local travel bearing, and the two
/// flanking field points
#[derive(Debug, Clone, Copy)]
pub struct RoadPointRecord {
    pub lat: f64,
    pub lon: f64,
    pub bearing: f64,
    pub left_lat: f64,
    pub left_lon: f64,
    pub right_lat: f64,
    pub right_lon: f64,
}

impl RoadPointRecord {
    pub fn new(road: GeoPoint, bearing: f64, left: FieldPoint, right: FieldPoint) -> Self {
        Self {
            lat: road.lat,
            lon: road.lon,
            bearing,
            left_lat: left.point.lat,
            left_lon: left.point.lon,
            right_lat: right.point.lat,
            right_lon: right.point.lon,
        }
    }
}
