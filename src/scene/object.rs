//! Renderable scene objects.

use eframe::egui::Color32;
use glam::{DVec2, DVec3};

/// Geometry types the viewer knows how to build and toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
}

impl GeometryKind {
    /// GeoJSON type string, also used as the scene object tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::Polygon => "Polygon",
        }
    }

    /// Parses a tag back into a kind. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Point" => Some(GeometryKind::Point),
            "LineString" => Some(GeometryKind::LineString),
            "Polygon" => Some(GeometryKind::Polygon),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GeometryKind::Point => "Points",
            GeometryKind::LineString => "Lines",
            GeometryKind::Polygon => "Polygons",
        }
    }

    pub fn all() -> &'static [GeometryKind] {
        &[
            GeometryKind::Point,
            GeometryKind::LineString,
            GeometryKind::Polygon,
        ]
    }
}

/// Drawing style shared by all primitives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub color: Color32,
    /// 0.0 (invisible) to 1.0 (opaque)
    pub opacity: f32,
    /// Stroke width in screen pixels (lines and outlines)
    pub line_width: f32,
    /// Render faces seen from behind as well
    pub double_sided: bool,
}

impl Style {
    pub fn solid(color: Color32) -> Self {
        Self {
            color,
            opacity: 1.0,
            line_width: 1.0,
            double_sided: false,
        }
    }

    /// Color with opacity applied.
    pub fn effective_color(&self) -> Color32 {
        let alpha = (self.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Color32::from_rgba_unmultiplied(self.color.r(), self.color.g(), self.color.b(), alpha)
    }
}

/// A closed planar outline and its fill triangulation.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    /// Outline vertices; the path starts at the first one and closes back to it.
    pub outline: Vec<DVec2>,
    /// Fill triangles in the surface plane
    pub triangles: Vec<[DVec2; 3]>,
    /// Height of the surface plane
    pub z: f64,
}

/// Geometric primitive of a scene object.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Sphere {
        center: DVec3,
        radius: f64,
        segments: u32,
    },
    Polyline {
        vertices: Vec<DVec3>,
    },
    Surface(Surface),
    /// Three colored axis lines (x red, y green, z blue)
    Axes {
        origin: DVec3,
        length: f64,
    },
}

/// A renderable object owned by the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub primitive: Primitive,
    pub style: Style,
    /// Source geometry type, if any
    pub tag: Option<String>,
    pub visible: bool,
}

impl SceneObject {
    /// Creates a visible, untagged object.
    pub fn new(primitive: Primitive, style: Style) -> Self {
        Self {
            primitive,
            style,
            tag: None,
            visible: true,
        }
    }

    /// Untagged reference axes at the scene origin.
    pub fn axes(length: f64) -> Self {
        Self::new(
            Primitive::Axes {
                origin: DVec3::ZERO,
                length,
            },
            Style {
                line_width: 1.5,
                ..Style::solid(Color32::WHITE)
            },
        )
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Geometry kind derived from the tag.
    pub fn kind(&self) -> Option<GeometryKind> {
        self.tag.as_deref().and_then(GeometryKind::from_tag)
    }

    /// Placement of point-like primitives (spheres and axes).
    pub fn position(&self) -> Option<DVec3> {
        match &self.primitive {
            Primitive::Sphere { center, .. } => Some(*center),
            Primitive::Axes { origin, .. } => Some(*origin),
            _ => None,
        }
    }

    /// Representative depth point used for draw ordering.
    pub fn anchor(&self) -> DVec3 {
        if let Some(position) = self.position() {
            return position;
        }
        match &self.primitive {
            Primitive::Polyline { vertices } => centroid(vertices.iter().copied()),
            Primitive::Surface(surface) => {
                centroid(surface.outline.iter().map(|p| p.extend(surface.z)))
            }
            Primitive::Sphere { .. } | Primitive::Axes { .. } => DVec3::ZERO,
        }
    }
}

fn centroid(points: impl Iterator<Item = DVec3>) -> DVec3 {
    let (sum, count) = points.fold((DVec3::ZERO, 0usize), |(sum, n), p| (sum + p, n + 1));
    if count == 0 {
        DVec3::ZERO
    } else {
        sum / count as f64
    }
}
