//! Map projection from geographic to scene coordinates.
//!
//! A plain linear map around a fixed reference point. There is no geodesic
//! correction; invalid input (NaN, out-of-range degrees) passes through.

use crate::config::ProjectionConfig;
use geo_types::Coord;
use glam::DVec2;

/// Linear projection converting (lon, lat) degrees to planar scene units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    /// Longitude mapped to x = 0
    pub lon_ref: f64,
    /// Latitude mapped to y = 0
    pub lat_ref: f64,
    /// Scene units per degree
    pub scale: f64,
}

impl Default for Projector {
    fn default() -> Self {
        Self::from(ProjectionConfig::default())
    }
}

impl From<ProjectionConfig> for Projector {
    fn from(config: ProjectionConfig) -> Self {
        Self {
            lon_ref: config.lon_ref,
            lat_ref: config.lat_ref,
            scale: config.scale,
        }
    }
}

impl Projector {
    /// Converts geographic coordinates to a planar point.
    pub fn project(&self, lon: f64, lat: f64) -> DVec2 {
        DVec2::new((lon - self.lon_ref) * self.scale, (lat - self.lat_ref) * self.scale)
    }

    /// Converts a `Coord` whose x is longitude and y is latitude.
    pub fn project_coord(&self, coord: Coord<f64>) -> DVec2 {
        self.project(coord.x, coord.y)
    }

    /// Converts a planar point back to geographic coordinates (lon, lat).
    pub fn unproject(&self, point: DVec2) -> Coord<f64> {
        Coord {
            x: point.x / self.scale + self.lon_ref,
            y: point.y / self.scale + self.lat_ref,
        }
    }
}
