use geo::{LineString, Simplify};

use crate::domain::GeoPoint;

/// Simplify a boundary ring with Ramer-Douglas-Peucker before it is turned
/// into an Overpass poly filter. Keeps the query string short for large
/// administrative boundaries.
///
/// Returns the original ring when it is already small or when simplification
/// would collapse it below a valid ring size.
pub fn simplify_ring(ring: &[GeoPoint], tolerance_degrees: f64) -> Vec<GeoPoint> {
    if ring.len() < 5 {
        return ring.to_vec();
    }

    let line: LineString<f64> = ring
        .iter()
        .map(|p| geo::coord! { x: p.lon, y: p.lat })
        .collect();

    let simplified = line.simplify(&tolerance_degrees);

    if simplified.0.len() < 4 {
        return ring.to_vec();
    }

    simplified
        .0
        .into_iter()
        .map(|c| GeoPoint::new(c.y, c.x))
        .collect()
}
