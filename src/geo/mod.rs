//! GeoJSON ingestion for the scene.
//!
//! This module converts GeoJSON documents into scene objects: parsing and
//! per-feature validation, the linear lon/lat projection, and the feature
//! builder that picks a primitive per geometry type.

mod builder;
mod document;
mod projection;

pub use builder::FeatureBuilder;
pub use document::{parse_document, GeoDocument};
pub use projection::Projector;
