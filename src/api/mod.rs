pub mod overpass;

pub use overpass::{Element, GeomVertex, OverpassResponse, QueryError, fetch_ways};
