use geo::{EuclideanLength, LineInterpolatePoint, LineString};

use crate::domain::GeoPoint;

/// How far (in degrees) the last sample may sit from the true final vertex
/// before the vertex is appended to the output
const ENDPOINT_EPSILON: f64 = 1e-9;

/// Resample a polyline at fixed arc-length increments.
///
/// The step is a planar arc-length parameter in coordinate-degree space, not
/// meters: segment lengths are Euclidean distances between raw lat/lon pairs.
/// The downstream bearing/offset math is spherical, so the two stages are not
/// on the same model; this mismatch is part of the established output contract
/// and is kept as-is.
///
/// The output starts at the first input vertex and always ends at the true
/// final vertex (appended when the last sample falls short of it). A result
/// with fewer than 2 points means the polyline is too degenerate to process
/// and callers must skip it.
pub fn densify(points: &[GeoPoint], step_degrees: f64) -> Vec<GeoPoint> {
    if points.len() < 2 || step_degrees <= 0.0 {
        return points.to_vec();
    }

    let line: LineString<f64> = points
        .iter()
        .map(|p| geo::coord! { x: p.lon, y: p.lat })
        .collect();

    let total_length = line.euclidean_length();
    if total_length == 0.0 {
        // All vertices coincide; signal "too short" to the caller
        return vec![points[0]];
    }

    let mut resampled = Vec::with_capacity((total_length / step_degrees) as usize + 2);
    let mut distance = 0.0;
    while distance < total_length {
        if let Some(p) = line.line_interpolate_point(distance / total_length) {
            resampled.push(GeoPoint::new(p.y(), p.x()));
        }
        distance += step_degrees;
    }

    let terminal = points[points.len() - 1];
    let needs_terminal = match resampled.last() {
        Some(last) => {
            let dx = last.lon - terminal.lon;
            let dy = last.lat - terminal.lat;
            (dx * dx + dy * dy).sqrt() > ENDPOINT_EPSILON
        }
        None => true,
    };
    if needs_terminal {
        resampled.push(terminal);
    }

    resampled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_densify_straight_segment() {
        // 0.00105 degrees long with a 0.0001 step: samples at 0, 0.0001, ...,
        // 0.001 (11 of them) plus the appended terminal vertex
        let points = vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.00105)];
        let result = densify(&points, 0.0001);

        assert_eq!(result.len(), 12);
        assert_eq!(result[0], points[0]);
        let last = result[result.len() - 1];
        assert!((last.lon - 0.00105).abs() < 1e-12);
        assert!((result[1].lon - 0.0001).abs() < 1e-9);
    }

    #[test]
    fn test_densify_starts_at_first_vertex() {
        let points = vec![GeoPoint::new(12.5, 77.0), GeoPoint::new(12.6, 77.1)];
        let result = densify(&points, 0.001);
        assert_eq!(result[0], points[0]);
    }

    #[test]
    fn test_densify_keeps_terminal_vertex() {
        let points = vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.00035)];
        let result = densify(&points, 0.0001);
        let last = result[result.len() - 1];
        assert!((last.lon - 0.00035).abs() < 1e-12);
        assert!((last.lat).abs() < 1e-12);
    }

    #[test]
    fn test_densify_multi_segment() {
        // An L-shaped line: total planar length 0.002
        let points = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 0.001),
            GeoPoint::new(0.001, 0.001),
        ];
        let result = densify(&points, 0.0001);
        assert!(result.len() >= 20);
        assert_eq!(result[0], points[0]);
        let last = result[result.len() - 1];
        assert!((last.lat - 0.001).abs() < 1e-9);
        assert!((last.lon - 0.001).abs() < 1e-9);
    }

    #[test]
    fn test_densify_single_point_passthrough() {
        let points = vec![GeoPoint::new(1.0, 2.0)];
        let result = densify(&points, 0.0001);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_densify_coincident_vertices() {
        let p = GeoPoint::new(10.0, 20.0);
        let result = densify(&[p, p, p], 0.0001);
        assert!(result.len() < 2);
    }
}
