use std::collections::HashMap;

use super::GeoPoint;

/// A road segment as returned by the road-data source: an ordered vertex
/// list plus its OSM tags
#[derive(Debug, Clone)]
pub struct Way {
    pub id: u64,
    pub points: Vec<GeoPoint>,
    pub tags: HashMap<String, String>,
}

impl Way {
    pub fn new(id: u64, points: Vec<GeoPoint>, tags: HashMap<String, String>) -> Self {
        Self { id, points, tags }
    }

    /// Only ways tagged as part of the road network are eligible for sampling.
    /// Any "highway" value qualifies.
    pub fn is_highway(&self) -> bool {
        self.tags.contains_key("highway")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_highway() {
        let mut tags = HashMap::new();
        tags.insert("highway".to_string(), "primary".to_string());
        let way = Way::new(1, vec![GeoPoint::new(0.0, 0.0)], tags);
        assert!(way.is_highway());

        let mut tags = HashMap::new();
        tags.insert("waterway".to_string(), "river".to_string());
        let way = Way::new(2, vec![GeoPoint::new(0.0, 0.0)], tags);
        assert!(!way.is_highway());
    }
}
