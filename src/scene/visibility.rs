//! Per-geometry-type visibility toggles.

use super::{GeometryKind, SceneObject};

/// Show/hide flags for each geometry type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityFlags {
    pub show_points: bool,
    pub show_lines: bool,
    pub show_polygons: bool,
}

impl Default for VisibilityFlags {
    fn default() -> Self {
        Self {
            show_points: true,
            show_lines: true,
            show_polygons: true,
        }
    }
}

impl VisibilityFlags {
    pub fn is_shown(&self, kind: GeometryKind) -> bool {
        match kind {
            GeometryKind::Point => self.show_points,
            GeometryKind::LineString => self.show_lines,
            GeometryKind::Polygon => self.show_polygons,
        }
    }

    pub fn flag_mut(&mut self, kind: GeometryKind) -> &mut bool {
        match kind {
            GeometryKind::Point => &mut self.show_points,
            GeometryKind::LineString => &mut self.show_lines,
            GeometryKind::Polygon => &mut self.show_polygons,
        }
    }
}

/// Sets the visibility of every tagged object from `flags`.
///
/// Objects without a tag, or with a tag that is not a known geometry type,
/// keep whatever visibility they already have.
pub fn apply_visibility(objects: &mut [SceneObject], flags: &VisibilityFlags) {
    for object in objects.iter_mut() {
        if let Some(kind) = object.kind() {
            object.visible = flags.is_shown(kind);
        }
    }
}
