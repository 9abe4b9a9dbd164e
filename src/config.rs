//! Viewer configuration.
//!
//! All values are compiled-in defaults; there is no config file, CLI or
//! environment lookup.

use eframe::egui::Color32;
use serde::{Deserialize, Serialize};

/// Reference longitude of the projection origin.
pub const LON_REF: f64 = -101.1744;
/// Reference latitude of the projection origin.
pub const LAT_REF: f64 = 22.2393;
/// Scene units per degree.
pub const SCALE: f64 = 50_000.0;

/// GeoJSON files loaded at startup.
pub const STARTUP_PATHS: [&str; 2] = [
    "data/sample_points.geojson",
    "data/sample_features.geojson",
];

/// Top-level viewer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub projection: ProjectionConfig,
    pub data_paths: Vec<String>,
    pub styles: FeatureStyles,
    pub camera: CameraConfig,
    /// Canvas clear color as 0xRRGGBB
    pub background: u32,
    /// Draw the reference axes at the projection origin
    pub show_axes: bool,
    /// Length of each reference axis in scene units
    pub axes_length: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            projection: ProjectionConfig::default(),
            data_paths: STARTUP_PATHS.iter().map(|p| p.to_string()).collect(),
            styles: FeatureStyles::default(),
            camera: CameraConfig::default(),
            background: 0xf0f0f0,
            show_axes: true,
            axes_length: 500.0,
        }
    }
}

impl ViewerConfig {
    pub fn background_color(&self) -> Color32 {
        rgb(self.background)
    }
}

/// Reference point and scale of the linear projection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub lon_ref: f64,
    pub lat_ref: f64,
    pub scale: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            lon_ref: LON_REF,
            lat_ref: LAT_REF,
            scale: SCALE,
        }
    }
}

/// Fixed visual styles per geometry type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureStyles {
    pub point_color: u32,
    pub point_radius: f64,
    pub point_segments: u32,
    pub line_color: u32,
    pub line_width: f32,
    pub polygon_color: u32,
    pub polygon_opacity: f32,
}

impl Default for FeatureStyles {
    fn default() -> Self {
        Self {
            point_color: 0xff0000,
            point_radius: 15.0,
            point_segments: 16,
            line_color: 0x0000ff,
            line_width: 2.0,
            polygon_color: 0x00ff00,
            polygon_opacity: 0.5,
        }
    }
}

/// Perspective camera and orbit control defaults.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    /// Initial distance from the target along +Z
    pub distance: f32,
    /// Fraction of orbit velocity removed each frame
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 45.0,
            near: 1.0,
            far: 10_000.0,
            distance: 1000.0,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.2,
            pan_speed: 0.8,
        }
    }
}

/// Converts a 0xRRGGBB value to an opaque color.
pub fn rgb(hex: u32) -> Color32 {
    Color32::from_rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}
