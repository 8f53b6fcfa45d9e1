use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

use crate::config::OverpassConfig;
use crate::domain::GeoPoint;

const USER_AGENT: &str = "roadpoints/0.1.0 (https://github.com/jordi-mit/roadpoints)";

/// Failure of one polygon's road-data query. Surfaced per polygon so the
/// caller can log it and move on to the next boundary.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Overpass API returned error status {0}")]
    Status(u16),
    #[error("failed to parse Overpass JSON response: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("all Overpass endpoints failed: {0}")]
    Exhausted(String),
}

/// Raw Overpass API response
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    pub elements: Vec<Element>,
}

/// A single element from Overpass. Ways queried with `out geom` carry their
/// vertex coordinates inline, so no node lookup pass is needed.
#[derive(Debug, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub type_: String,
    pub id: u64,
    #[serde(default)]
    pub tags: Option<HashMap<String, String>>,
    #[serde(default)]
    pub geometry: Option<Vec<GeomVertex>>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct GeomVertex {
    pub lat: f64,
    pub lon: f64,
}

/// Build an Overpass QL query selecting every way inside a polygon.
///
/// The poly filter takes space-separated "lat lon" pairs. No tag filter is
/// applied here; highway filtering happens client-side so skipped ways can be
/// reported.
fn build_poly_query(ring: &[GeoPoint]) -> String {
    let coords: Vec<String> = ring.iter().map(|p| format!("{} {}", p.lat, p.lon)).collect();
    format!(
        "[out:json][timeout:180];\nway(poly:\"{}\");\nout geom;",
        coords.join(" ")
    )
}

/// Fetch all ways intersecting the given boundary ring
///
/// # Arguments
/// * `ring` - Polygon exterior as (lat, lon) vertices, already simplified
/// * `config` - Endpoint list, timeout, and retry budget
pub fn fetch_ways(
    ring: &[GeoPoint],
    config: &OverpassConfig,
) -> Result<OverpassResponse, QueryError> {
    let query = build_poly_query(ring);
    execute_overpass_query(&query, config)
}

/// Execute an Overpass query, rotating through mirrors and retrying on the
/// retriable statuses (429 Too Many Requests, 504 Gateway Timeout)
fn execute_overpass_query(
    query: &str,
    config: &OverpassConfig,
) -> Result<OverpassResponse, QueryError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(QueryError::Client)?;

    let mut last_error = String::from("no endpoints configured");

    for attempt in 0..config.max_retries {
        if attempt > 0 {
            // Overpass asks clients to back off when overloaded
            let wait_secs = 30 * attempt as u64;
            eprintln!(
                "Overpass API busy, retrying in {} seconds (attempt {}/{})",
                wait_secs,
                attempt + 1,
                config.max_retries
            );
            std::thread::sleep(Duration::from_secs(wait_secs));
        }

        for url in &config.urls {
            // Overpass expects form-encoded POST data: data=<query>
            let response = match client.post(url).form(&[("data", query)]).send() {
                Ok(r) => r,
                Err(e) => {
                    last_error = format!("{}: {}", url, e);
                    continue;
                }
            };

            match response.status().as_u16() {
                200 => {
                    return response.json().map_err(QueryError::Decode);
                }
                429 | 504 => {
                    last_error = format!("{} returned status {}", url, response.status());
                    continue;
                }
                status => {
                    return Err(QueryError::Status(status));
                }
            }
        }
    }

    Err(QueryError::Exhausted(last_error))
}
