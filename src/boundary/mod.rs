//! Boundary source: administrative polygons loaded from a GeoJSON
//! FeatureCollection. Only exterior rings are used; a MultiPolygon
//! contributes one ring per member polygon.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::Path;

use crate::domain::GeoPoint;

/// One administrative boundary. A plain polygon has a single ring; each
/// member of a multipolygon contributes one, and their road-record outputs
/// are concatenated downstream.
#[derive(Debug)]
pub struct Boundary {
    pub name: Option<String>,
    pub rings: Vec<Vec<GeoPoint>>,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
    #[serde(default)]
    properties: Option<serde_json::Value>,
}

/// GeoJSON positions are [lon, lat]
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: Vec<Vec<[f64; 2]>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<[f64; 2]>>> },
}

/// Load boundaries from a GeoJSON file
///
/// # Returns
/// * One `Boundary` per feature, in file order
pub fn load_boundaries(path: &Path) -> Result<Vec<Boundary>> {
    let contents = std::fs::read_to_string(path)
        .context(format!("Failed to read boundary file: {:?}", path))?;

    let collection: FeatureCollection =
        serde_json::from_str(&contents).context("Failed to parse boundary GeoJSON")?;

    if collection.features.is_empty() {
        bail!("Boundary file contains no features: {:?}", path);
    }

    Ok(collection
        .features
        .into_iter()
        .map(boundary_from_feature)
        .collect())
}

fn boundary_from_feature(feature: Feature) -> Boundary {
    let name = feature
        .properties
        .as_ref()
        .and_then(|p| p.get("name"))
        .and_then(|n| n.as_str())
        .map(|s| s.to_string());

    let rings = match feature.geometry {
        Geometry::Polygon { coordinates } => coordinates
            .into_iter()
            .take(1) // exterior ring only
            .map(ring_to_points)
            .collect(),
        Geometry::MultiPolygon { coordinates } => coordinates
            .into_iter()
            .filter_map(|polygon| polygon.into_iter().next())
            .map(ring_to_points)
            .collect(),
    };

    Boundary { name, rings }
}

fn ring_to_points(ring: Vec<[f64; 2]>) -> Vec<GeoPoint> {
    ring.into_iter()
        .map(|[lon, lat]| GeoPoint::new(lat, lon))
        .collect()
}
