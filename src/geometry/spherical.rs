//! Spherical Earth geometry: initial bearing between two points and the
//! destination point reached by travelling a distance along a bearing.
//!
//! Uses the standard great-circle formulas on a fixed-radius sphere. Accurate
//! to well under a metre at the 30m offsets this tool works with.

use crate::domain::GeoPoint;

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Fold a bearing into the half-open range [0, 360)
pub fn normalize_bearing(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0)
}

/// Initial great-circle bearing from one point to another
///
/// # Returns
/// * Bearing in degrees, clockwise from true north, in [0, 360)
///
/// Identical points yield atan2(0, 0), which is 0 for IEEE doubles.
pub fn bearing(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let delta_lon = (to.lon - from.lon).to_radians();

    let y = delta_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();

    normalize_bearing(y.atan2(x).to_degrees())
}

/// Point reached by travelling `distance_m` meters along `bearing_deg` from
/// `from`, on a sphere of radius `earth_radius_m`
pub fn destination_point(
    from: GeoPoint,
    bearing_deg: f64,
    distance_m: f64,
    earth_radius_m: f64,
) -> GeoPoint {
    let angular_distance = distance_m / earth_radius_m;
    let theta = bearing_deg.to_radians();
    let lat1 = from.lat.to_radians();
    let lon1 = from.lon.to_radians();

    let lat2 = (lat1.sin() * angular_distance.cos()
        + lat1.cos() * angular_distance.sin() * theta.cos())
    .asin();
    let lon2 = lon1
        + (theta.sin() * angular_distance.sin() * lat1.cos())
            .atan2(angular_distance.cos() - lat1.sin() * lat2.sin());

    GeoPoint::new(lat2.to_degrees(), lon2.to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearing_range() {
        let cases = [
            (GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 0.0)),
            (GeoPoint::new(0.0, 0.0), GeoPoint::new(-1.0, 0.0)),
            (GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0)),
            (GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, -1.0)),
            (GeoPoint::new(51.5, -0.1), GeoPoint::new(48.9, 2.4)),
            (GeoPoint::new(-33.9, 151.2), GeoPoint::new(35.7, 139.7)),
        ];
        for (from, to) in cases {
            let b = bearing(from, to);
            assert!((0.0..360.0).contains(&b), "bearing {} out of range", b);
        }
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = GeoPoint::new(0.0, 0.0);
        assert!((bearing(origin, GeoPoint::new(1.0, 0.0)) - 0.0).abs() < 1e-9);
        assert!((bearing(origin, GeoPoint::new(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!((bearing(origin, GeoPoint::new(-1.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((bearing(origin, GeoPoint::new(0.0, -1.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_bearing_identical_points() {
        // Degenerate atan2(0, 0) case: deterministic zero
        let p = GeoPoint::new(37.7749, -122.4194);
        assert_eq!(bearing(p, p), 0.0);
    }

    #[test]
    fn test_destination_zero_distance() {
        let p = GeoPoint::new(45.0, 9.0);
        let d = destination_point(p, 123.0, 0.0, EARTH_RADIUS_M);
        assert!((d.lat - p.lat).abs() < 1e-12);
        assert!((d.lon - p.lon).abs() < 1e-12);
    }

    #[test]
    fn test_destination_bearing_round_trip() {
        // Travelling a short distance then sighting back along the path
        // should recover the original bearing closely
        let p = GeoPoint::new(45.0, 9.0);
        for theta in [0.0, 37.0, 90.0, 135.0, 222.5, 359.0] {
            let dest = destination_point(p, theta, 500.0, EARTH_RADIUS_M);
            let recovered = bearing(p, dest);
            let mut diff = (recovered - theta).abs();
            if diff > 180.0 {
                diff = 360.0 - diff;
            }
            assert!(diff < 1.0, "theta {} recovered as {}", theta, recovered);
        }
    }

    #[test]
    fn test_destination_known_distance() {
        // 111.19 km due north is very close to one degree of latitude
        let p = GeoPoint::new(0.0, 0.0);
        let d = destination_point(p, 0.0, 111_195.0, EARTH_RADIUS_M);
        assert!((d.lat - 1.0).abs() < 0.001);
        assert!(d.lon.abs() < 1e-9);
    }

    #[test]
    fn test_normalize_bearing() {
        assert_eq!(normalize_bearing(0.0), 0.0);
        assert_eq!(normalize_bearing(360.0), 0.0);
        assert_eq!(normalize_bearing(-90.0), 270.0);
        assert_eq!(normalize_bearing(450.0), 90.0);
    }
}
