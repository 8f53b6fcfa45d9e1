use serde::Deserialize;
use std::path::PathBuf;

/// Geometry constants for the sampling pipeline.
///
/// Passed explicitly into the pipeline instead of living in globals, so runs
/// with different parameters never interfere.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    /// Spherical Earth radius in meters
    pub earth_radius_m: f64,
    /// Densification step along the polyline, in coordinate degrees
    pub densify_step_degrees: f64,
    /// Perpendicular offset of the field points, in meters
    pub field_offset_m: f64,
    /// Douglas-Peucker tolerance for boundary rings, in degrees
    pub simplify_tolerance_degrees: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            earth_radius_m: default_earth_radius_m(),
            densify_step_degrees: default_densify_step(),
            field_offset_m: default_field_offset_m(),
            simplify_tolerance_degrees: default_simplify_tolerance(),
        }
    }
}

fn default_earth_radius_m() -> f64 {
    6_371_000.0
}
fn default_densify_step() -> f64 {
    0.0001
}
fn default_field_offset_m() -> f64 {
    30.0
}
fn default_simplify_tolerance() -> f64 {
    0.001
}
fn default_start_index() -> usize {
    0
}
fn default_verbose() -> bool {
    false
}

/// Optional TOML configuration, merged under CLI flags
#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub boundaries: Option<PathBuf>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default = "default_start_index")]
    pub start_index: usize,
    #[serde(default = "default_earth_radius_m")]
    pub earth_radius_m: f64,
    #[serde(default = "default_densify_step")]
    pub densify_step_degrees: f64,
    #[serde(default = "default_field_offset_m")]
    pub field_offset_m: f64,
    #[serde(default = "default_simplify_tolerance")]
    pub simplify_tolerance_degrees: f64,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
    #[serde(default)]
    pub overpass: Option<OverpassConfig>,
}

fn default_overpass_urls() -> Vec<String> {
    vec![
        "https://overpass-api.de/api/interpreter".to_string(),
        "https://overpass.private.coffee/api/interpreter".to_string(),
        "https://maps.mail.ru/osm/tools/overpass/api/interpreter".to_string(),
    ]
}

fn default_timeout_secs() -> u64 {
    200
}

fn default_max_retries() -> u32 {
    3
}

#[derive(Debug, Deserialize, Clone)]
pub struct OverpassConfig {
    #[serde(default = "default_overpass_urls")]
    pub urls: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            urls: default_overpass_urls(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

impl FileConfig {
    pub fn load() -> Option<Self> {
        let config_paths = get_config_paths();

        for path in config_paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("roadpoints.toml"));
    paths.push(PathBuf::from(".roadpoints.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("roadpoints").join("config.toml"));
        paths.push(config_dir.join("roadpoints.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".roadpoints.toml"));
        paths.push(home.join(".config").join("roadpoints").join("config.toml"));
    }

    paths
}
