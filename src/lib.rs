//! roadpoints - Sample roadside field points along OpenStreetMap road networks

pub mod api;
pub mod boundary;
pub mod config;
pub mod domain;
pub mod geometry;
pub mod osm;
pub mod output;
pub mod pipeline;
