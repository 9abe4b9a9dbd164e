//! Conversion of GeoJSON features into scene objects.

use super::Projector;
use crate::config::{rgb, FeatureStyles};
use crate::scene::{GeometryKind, Primitive, SceneObject, Style, Surface};
// Explicit crate path to avoid confusion with the local geo module
use ::geo::TriangulateEarcut;
use geo_types::{Coord, LineString, Polygon};
use geojson::{Feature, Geometry, Value};
use glam::{DVec2, DVec3};

/// Feature geometry reduced to the variants the viewer can build.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureGeometry {
    Point(Coord<f64>),
    LineString(Vec<Coord<f64>>),
    Polygon {
        exterior: Vec<Coord<f64>>,
        /// Kept for completeness; never rendered
        holes: Vec<Vec<Coord<f64>>>,
    },
    /// Any other GeoJSON geometry type
    Unsupported(&'static str),
}

impl FeatureGeometry {
    /// Converts a GeoJSON geometry, rejecting malformed coordinates.
    pub fn from_geojson(geometry: &Geometry) -> Result<Self, String> {
        match &geometry.value {
            Value::Point(position) => Ok(FeatureGeometry::Point(to_coord(position)?)),
            Value::LineString(positions) => Ok(FeatureGeometry::LineString(to_coords(positions)?)),
            Value::Polygon(rings) => {
                let (exterior, holes) = rings
                    .split_first()
                    .ok_or_else(|| "Polygon has no exterior ring".to_string())?;
                if exterior.is_empty() {
                    return Err("Polygon exterior ring is empty".to_string());
                }
                Ok(FeatureGeometry::Polygon {
                    exterior: to_coords(exterior)?,
                    holes: holes.iter().filter_map(|ring| to_hole(ring)).collect(),
                })
            }
            other => Ok(FeatureGeometry::Unsupported(geometry_type_name(other))),
        }
    }

    pub fn kind(&self) -> Option<GeometryKind> {
        match self {
            FeatureGeometry::Point(_) => Some(GeometryKind::Point),
            FeatureGeometry::LineString(_) => Some(GeometryKind::LineString),
            FeatureGeometry::Polygon { .. } => Some(GeometryKind::Polygon),
            FeatureGeometry::Unsupported(_) => None,
        }
    }
}

/// GeoJSON type string of a geometry value.
fn geometry_type_name(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

fn to_coord(position: &[f64]) -> Result<Coord<f64>, String> {
    match position {
        [x, y, ..] => Ok(Coord { x: *x, y: *y }),
        _ => Err(format!(
            "Position needs at least 2 values, got {}",
            position.len()
        )),
    }
}

fn to_coords(positions: &[Vec<f64>]) -> Result<Vec<Coord<f64>>, String> {
    positions.iter().map(|p| to_coord(p)).collect()
}

/// Holes are never rendered, so a malformed one is dropped instead of
/// rejecting the polygon.
fn to_hole(positions: &[Vec<f64>]) -> Option<Vec<Coord<f64>>> {
    match to_coords(positions) {
        Ok(ring) => Some(ring),
        Err(e) => {
            log::debug!("Dropping malformed interior ring: {}", e);
            None
        }
    }
}

/// Builds scene objects from features using a fixed projection and styles.
#[derive(Debug, Clone)]
pub struct FeatureBuilder {
    projector: Projector,
    styles: FeatureStyles,
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self::new(Projector::default(), FeatureStyles::default())
    }
}

impl FeatureBuilder {
    pub fn new(projector: Projector, styles: FeatureStyles) -> Self {
        Self { projector, styles }
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    /// Builds the object for one feature, or `None` if it has nothing to show.
    ///
    /// Objects are tagged with their GeoJSON geometry type. Features without
    /// geometry or with malformed coordinates are logged and skipped;
    /// unsupported geometry types are skipped silently.
    pub fn build(&self, feature: &Feature) -> Option<SceneObject> {
        let Some(geometry) = feature.geometry.as_ref() else {
            log::warn!("Skipping feature{} with no geometry", describe(feature));
            return None;
        };

        match FeatureGeometry::from_geojson(geometry) {
            Ok(geometry) => self.build_geometry(&geometry),
            Err(e) => {
                log::warn!("Skipping feature{}: {}", describe(feature), e);
                None
            }
        }
    }

    /// Builds the object for an already validated geometry.
    pub fn build_geometry(&self, geometry: &FeatureGeometry) -> Option<SceneObject> {
        let object = match geometry {
            FeatureGeometry::Point(coord) => self.build_point(*coord),
            FeatureGeometry::LineString(coords) => self.build_line(coords),
            FeatureGeometry::Polygon { exterior, holes } => {
                // Holes are not cut out of the surface.
                if !holes.is_empty() {
                    log::debug!("Ignoring {} interior ring(s)", holes.len());
                }
                self.build_polygon(exterior)
            }
            FeatureGeometry::Unsupported(type_name) => {
                log::debug!("Ignoring unsupported geometry type {}", type_name);
                return None;
            }
        };

        geometry.kind().map(|kind| object.with_tag(kind.as_str()))
    }

    fn build_point(&self, coord: Coord<f64>) -> SceneObject {
        let center = self.projector.project_coord(coord).extend(0.0);
        SceneObject::new(
            Primitive::Sphere {
                center,
                radius: self.styles.point_radius,
                segments: self.styles.point_segments,
            },
            Style::solid(rgb(self.styles.point_color)),
        )
    }

    fn build_line(&self, coords: &[Coord<f64>]) -> SceneObject {
        let vertices: Vec<DVec3> = coords
            .iter()
            .map(|c| self.projector.project_coord(*c).extend(0.0))
            .collect();

        SceneObject::new(
            Primitive::Polyline { vertices },
            Style {
                line_width: self.styles.line_width,
                ..Style::solid(rgb(self.styles.line_color))
            },
        )
    }

    fn build_polygon(&self, exterior: &[Coord<f64>]) -> SceneObject {
        let outline: Vec<DVec2> = exterior
            .iter()
            .map(|c| self.projector.project_coord(*c))
            .collect();
        let triangles = triangulate(&outline);

        SceneObject::new(
            Primitive::Surface(Surface {
                outline,
                triangles,
                z: 0.0,
            }),
            Style {
                opacity: self.styles.polygon_opacity,
                double_sided: true,
                ..Style::solid(rgb(self.styles.polygon_color))
            },
        )
    }
}

/// Ear-clipping triangulation of a simple planar ring.
fn triangulate(outline: &[DVec2]) -> Vec<[DVec2; 3]> {
    if outline.len() < 3 {
        return Vec::new();
    }
    if !is_triangulable(outline) {
        log::warn!(
            "Skipping fill of a {}-vertex ring with out-of-range coordinates",
            outline.len()
        );
        return Vec::new();
    }

    let ring: Vec<Coord<f64>> = outline.iter().map(|p| Coord { x: p.x, y: p.y }).collect();
    let polygon = Polygon::new(LineString::from(ring), vec![]);

    polygon
        .earcut_triangles()
        .into_iter()
        .map(|triangle| triangle.to_array().map(|c| DVec2::new(c.x, c.y)))
        .collect()
}

/// Ear clipping needs every vertex, and the cross products of vertex
/// differences, to stay finite.
fn is_triangulable(outline: &[DVec2]) -> bool {
    if !outline.iter().all(|p| p.is_finite()) {
        return false;
    }

    let min = outline.iter().fold(DVec2::splat(f64::INFINITY), |m, p| m.min(*p));
    let max = outline
        .iter()
        .fold(DVec2::splat(f64::NEG_INFINITY), |m, p| m.max(*p));
    let extent = (max - min).max_element();
    (extent * extent).is_finite()
}

/// Short label for diagnostics, e.g. ` "Plaza"`.
fn describe(feature: &Feature) -> String {
    feature
        .properties
        .as_ref()
        .and_then(|p| p.get("name").or_else(|| p.get("NAME")))
        .and_then(|v| v.as_str())
        .map(|s| format!(" \"{}\"", s))
        .unwrap_or_default()
}
