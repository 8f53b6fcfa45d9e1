use anyhow::{Result, bail};

use crate::api::overpass::Element;
use crate::domain::{GeoPoint, Way};

/// Convert an Overpass way element into a domain Way.
///
/// Errors on malformed elements (missing `out geom` vertex list) so the
/// caller can record a per-way failure instead of dropping it silently.
/// Tag filtering is not done here; a tagless way is still a valid Way that
/// the pipeline will later skip as a non-highway.
pub fn way_from_element(element: &Element) -> Result<Way> {
    if element.type_ != "way" {
        bail!("element {} is not a way (type {})", element.id, element.type_);
    }

    let geometry = match &element.geometry {
        Some(g) => g,
        None => bail!("way {} has no geometry", element.id),
    };

    let points: Vec<GeoPoint> = geometry
        .iter()
        .map(|v| GeoPoint::new(v.lat, v.lon))
        .collect();

    let tags = element.tags.clone().unwrap_or_default();

    Ok(Way::new(element.id, points, tags))
}
