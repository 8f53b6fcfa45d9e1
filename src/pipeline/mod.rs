//! The sampling pipeline: densify each way, then walk the densified points
//! computing a local bearing and two perpendicular field points per interior
//! point.

use std::fmt;

use crate::api::overpass::{self, Element, QueryError};
use crate::config::{OverpassConfig, SampleConfig};
use crate::domain::{FieldPoint, GeoPoint, RoadPointRecord, Way};
use crate::geometry::{densify, simplify_ring, spherical};
use crate::osm::way_from_element;

/// Points excluded at the start of each densified way. Bearings near the
/// extremities are noisy, so the first 4 points emit nothing.
const GUARD_LEAD: usize = 4;
/// Points excluded at the end of each densified way
const GUARD_TRAIL: usize = 3;

/// Result of processing one way: records, or an explicit skip
pub enum WayOutcome {
    Emitted(Vec<RoadPointRecord>),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No "highway" tag key; the way is not part of the road network
    NotAHighway,
    /// Densification produced fewer than 2 points
    TooShort,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotAHighway => write!(f, "not a highway"),
            SkipReason::TooShort => write!(f, "too short after densification"),
        }
    }
}

/// A way that could not be processed at all (malformed element). Collected
/// rather than aborting the polygon, so partial results survive.
#[derive(Debug)]
pub struct WayFailure {
    pub way_id: u64,
    pub error: anyhow::Error,
}

/// Everything produced for one polygon: records from all its ways, plus the
/// skip and failure tallies for reporting
#[derive(Default)]
pub struct PolygonBatch {
    pub records: Vec<RoadPointRecord>,
    pub skipped: Vec<(u64, SkipReason)>,
    pub failures: Vec<WayFailure>,
}

/// Compute the records for one densified point sequence.
///
/// Iterates with a 0-based index, emitting only for indices past the guard
/// bands (skip the first 4 and last 3 points). The bearing is always taken
/// from the immediately preceding point to the current one, not from the
/// start of the guard band; this matches the established output contract.
pub fn process_points(densified: &[GeoPoint], config: &SampleConfig) -> Vec<RoadPointRecord> {
    let n = densified.len();
    let mut records = Vec::new();

    for j in 0..n {
        if j < GUARD_LEAD || j + GUARD_TRAIL >= n {
            continue;
        }

        let from = densified[j - 1];
        let to = densified[j];
        let bearing = spherical::bearing(from, to);

        let left = project_field_point(to, spherical::normalize_bearing(bearing + 90.0), config);
        let right = project_field_point(to, spherical::normalize_bearing(bearing + 270.0), config);

        records.push(RoadPointRecord::new(to, bearing, left, right));
    }

    records
}

fn project_field_point(road: GeoPoint, bearing: f64, config: &SampleConfig) -> FieldPoint {
    let point =
        spherical::destination_point(road, bearing, config.field_offset_m, config.earth_radius_m);
    FieldPoint {
        point,
        bearing,
        road,
    }
}

/// Densify and process a single way
pub fn process_way(way: &Way, config: &SampleConfig) -> WayOutcome {
    if !way.is_highway() {
        return WayOutcome::Skipped(SkipReason::NotAHighway);
    }

    let densified = densify(&way.points, config.densify_step_degrees);
    if densified.len() < 2 {
        return WayOutcome::Skipped(SkipReason::TooShort);
    }

    WayOutcome::Emitted(process_points(&densified, config))
}

/// Process one administrative polygon: query each of its rings, then run
/// every returned way through the pipeline.
///
/// Multipolygon members are queried independently and their road data
/// concatenated before processing. A query failure aborts only this polygon;
/// per-way problems are collected in the batch and never abort it.
pub fn process_polygon(
    rings: &[Vec<GeoPoint>],
    sample: &SampleConfig,
    overpass: &OverpassConfig,
) -> Result<PolygonBatch, QueryError> {
    let mut elements: Vec<Element> = Vec::new();
    for ring in rings {
        let simplified = simplify_ring(ring, sample.simplify_tolerance_degrees);
        let response = overpass::fetch_ways(&simplified, overpass)?;
        elements.extend(response.elements);
    }

    Ok(process_elements(&elements, sample))
}

/// Run already-fetched Overpass elements through the per-way pipeline
pub fn process_elements(elements: &[Element], sample: &SampleConfig) -> PolygonBatch {
    let mut batch = PolygonBatch::default();

    for element in elements {
        if element.type_ != "way" {
            continue;
        }

        match way_from_element(element) {
            Ok(way) => match process_way(&way, sample) {
                WayOutcome::Emitted(records) => batch.records.extend(records),
                WayOutcome::Skipped(reason) => batch.skipped.push((way.id, reason)),
            },
            Err(error) => batch.failures.push(WayFailure {
                way_id: element.id,
                error,
            }),
        }
    }

    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::overpass::GeomVertex;
    use std::collections::HashMap;

    fn highway_tags() -> HashMap<String, String> {
        let mut tags = HashMap::new();
        tags.insert("highway".to_string(), "primary".to_string());
        tags
    }

    /// A straight eastbound polyline on the equator with `n` points
    fn straight_points(n: usize, spacing: f64) -> Vec<GeoPoint> {
        (0..n)
            .map(|i| GeoPoint::new(0.0, i as f64 * spacing))
            .collect()
    }

    #[test]
    fn test_process_points_record_count() {
        let config = SampleConfig::default();
        for n in [0, 2, 7, 8, 10, 50] {
            let points = straight_points(n, 0.0001);
            let records = process_points(&points, &config);
            let expected = n.saturating_sub(GUARD_LEAD + GUARD_TRAIL);
            assert_eq!(records.len(), expected, "n = {}", n);
        }
    }

    #[test]
    fn test_process_points_offsets_are_perpendicular() {
        let config = SampleConfig::default();
        let points = straight_points(12, 0.0001);
        let records = process_points(&points, &config);
        assert!(!records.is_empty());

        for record in &records {
            // Straight east means bearing 90; offsets sit at 180 and 0
            assert!((record.bearing - 90.0).abs() < 1e-6);
            let left_bearing = spherical::bearing(
                GeoPoint::new(record.lat, record.lon),
                GeoPoint::new(record.left_lat, record.left_lon),
            );
            let right_bearing = spherical::bearing(
                GeoPoint::new(record.lat, record.lon),
                GeoPoint::new(record.right_lat, record.right_lon),
            );
            assert!((left_bearing - 180.0).abs() < 0.01);
            assert!(right_bearing < 0.01 || right_bearing > 359.99);
        }
    }

    #[test]
    fn test_process_points_uses_previous_point_for_bearing() {
        let config = SampleConfig::default();
        // A polyline that turns north at the 6th point: the first emitted
        // record (index 4) must use points 3 -> 4, still eastbound
        let mut points = straight_points(6, 0.0001);
        for i in 1..=6 {
            points.push(GeoPoint::new(i as f64 * 0.0001, 0.0005));
        }
        let records = process_points(&points, &config);
        assert!((records[0].bearing - 90.0).abs() < 1e-6);
        // Within the northbound stretch the bearing flips to ~0
        let last = records.last().unwrap();
        assert!(last.bearing < 1.0 || last.bearing > 359.0);
    }

    #[test]
    fn test_process_way_skips_non_highway() {
        let config = SampleConfig::default();
        let mut tags = HashMap::new();
        tags.insert("waterway".to_string(), "river".to_string());
        let way = Way::new(1, straight_points(100, 0.0001), tags);

        match process_way(&way, &config) {
            WayOutcome::Skipped(SkipReason::NotAHighway) => {}
            _ => panic!("expected NotAHighway skip"),
        }
    }

    #[test]
    fn test_process_way_skips_degenerate_geometry() {
        let config = SampleConfig::default();
        let p = GeoPoint::new(10.0, 20.0);
        let way = Way::new(2, vec![p, p], highway_tags());

        match process_way(&way, &config) {
            WayOutcome::Skipped(SkipReason::TooShort) => {}
            _ => panic!("expected TooShort skip"),
        }
    }

    #[test]
    fn test_straight_highway_end_to_end() {
        let config = SampleConfig::default();
        // 100 vertices spaced 0.001 degrees apart along the equator
        let way = Way::new(3, straight_points(100, 0.001), highway_tags());

        let densified = densify(&way.points, config.densify_step_degrees);
        let records = match process_way(&way, &config) {
            WayOutcome::Emitted(r) => r,
            WayOutcome::Skipped(reason) => panic!("unexpected skip: {}", reason),
        };

        assert!(!records.is_empty());
        assert_eq!(
            records.len(),
            densified.len() - (GUARD_LEAD + GUARD_TRAIL)
        );
        for record in &records {
            assert!((record.bearing - 90.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_process_elements_partitions_outcomes() {
        let config = SampleConfig::default();
        let elements = vec![
            Element {
                type_: "way".to_string(),
                id: 1,
                tags: Some(highway_tags()),
                geometry: Some(
                    (0..100)
                        .map(|i| GeomVertex {
                            lat: 0.0,
                            lon: i as f64 * 0.001,
                        })
                        .collect(),
                ),
            },
            Element {
                type_: "way".to_string(),
                id: 2,
                tags: None,
                geometry: Some(vec![
                    GeomVertex { lat: 0.0, lon: 0.0 },
                    GeomVertex { lat: 0.0, lon: 0.001 },
                ]),
            },
            Element {
                type_: "way".to_string(),
                id: 3,
                tags: Some(highway_tags()),
                geometry: None,
            },
        ];

        let batch = process_elements(&elements, &config);
        assert!(!batch.records.is_empty());
        assert_eq!(batch.skipped, vec![(2, SkipReason::NotAHighway)]);
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.failures[0].way_id, 3);
    }
}
