//! The shared scene container.

use super::{apply_visibility, GeometryKind, SceneObject, VisibilityFlags};
use crate::geo::{FeatureBuilder, GeoDocument};

/// All objects in the scene together with the current visibility flags.
///
/// Objects are only ever added; they live for the rest of the session.
#[derive(Debug, Default)]
pub struct SceneState {
    objects: Vec<SceneObject>,
    flags: VisibilityFlags,
}

impl SceneState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn visible_objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter().filter(|o| o.visible)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn flags(&self) -> VisibilityFlags {
        self.flags
    }

    /// Number of objects built from the given geometry type.
    pub fn count(&self, kind: GeometryKind) -> usize {
        self.objects
            .iter()
            .filter(|o| o.kind() == Some(kind))
            .count()
    }

    /// Adds an object as-is, without touching its visibility.
    pub fn insert(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    /// Builds and inserts an object for every usable feature of `document`,
    /// then re-applies the current flags. Returns the number of objects added.
    pub fn populate(&mut self, document: &GeoDocument, builder: &FeatureBuilder) -> usize {
        let before = self.objects.len();

        self.objects
            .extend(document.features.iter().filter_map(|f| builder.build(f)));
        self.apply_visibility();

        self.objects.len() - before
    }

    /// Replaces the flags and updates every object.
    pub fn set_flags(&mut self, flags: VisibilityFlags) {
        self.flags = flags;
        self.apply_visibility();
    }

    pub fn apply_visibility(&mut self) {
        apply_visibility(&mut self.objects, &self.flags);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::parse_document;

    const POINTS_DOC: &[u8] = br#"{
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "properties": {},
              "geometry": { "type": "Point", "coordinates": [-101.1744, 22.2393] } },
            { "type": "Feature", "properties": {},
              "geometry": { "type": "Point", "coordinates": [-101.17, 22.24] } }
        ]
    }"#;

    const MIXED_DOC: &[u8] = br#"{
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "properties": {},
              "geometry": { "type": "Point", "coordinates": [-101.18, 22.23] } },
            { "type": "Feature", "properties": {},
              "geometry": { "type": "LineString",
                            "coordinates": [[-101.18, 22.23], [-101.17, 22.24]] } },
            { "type": "Feature", "properties": {},
              "geometry": { "type": "Polygon",
                            "coordinates": [[[-101.18, 22.23], [-101.17, 22.23],
                                             [-101.17, 22.24], [-101.18, 22.23]]] } },
            { "type": "Feature", "properties": {}, "geometry": null },
            { "type": "Feature", "properties": {},
              "geometry": { "type": "MultiPoint", "coordinates": [[-101.18, 22.23]] } }
        ]
    }"#;

    fn doc(bytes: &[u8]) -> GeoDocument {
        parse_document(bytes).expect("test document parses")
    }

    #[test]
    fn test_populate_skips_unbuildable_features() {
        let mut scene = SceneState::new();
        let added = scene.populate(&doc(MIXED_DOC), &FeatureBuilder::default());

        assert_eq!(added, 3);
        assert_eq!(scene.count(GeometryKind::Point), 1);
        assert_eq!(scene.count(GeometryKind::LineString), 1);
        assert_eq!(scene.count(GeometryKind::Polygon), 1);
    }

    #[test]
    fn test_populate_empty_document_is_noop() {
        let mut scene = SceneState::new();
        let added = scene.populate(&GeoDocument::default(), &FeatureBuilder::default());
        assert_eq!(added, 0);
        assert!(scene.is_empty());
    }

    #[test]
    fn test_populate_respects_existing_flags() {
        let mut scene = SceneState::new();
        scene.set_flags(VisibilityFlags {
            show_lines: false,
            ..Default::default()
        });

        scene.populate(&doc(MIXED_DOC), &FeatureBuilder::default());

        for object in scene.objects() {
            let expected = object.kind() != Some(GeometryKind::LineString);
            assert_eq!(object.visible, expected);
        }
    }

    #[test]
    fn test_hiding_points_spans_documents() {
        let builder = FeatureBuilder::default();
        let mut scene = SceneState::new();
        scene.populate(&doc(POINTS_DOC), &builder);
        scene.populate(&doc(MIXED_DOC), &builder);
        assert_eq!(scene.count(GeometryKind::Point), 3);

        scene.set_flags(VisibilityFlags {
            show_points: false,
            ..Default::default()
        });

        assert!(scene
            .objects()
            .iter()
            .filter(|o| o.kind() == Some(GeometryKind::Point))
            .all(|o| !o.visible));
        assert_eq!(scene.visible_objects().count(), 2);
    }

    #[test]
    fn test_untagged_helper_survives_toggles() {
        let mut scene = SceneState::new();
        scene.insert(SceneObject::axes(100.0));
        scene.populate(&doc(POINTS_DOC), &FeatureBuilder::default());

        scene.set_flags(VisibilityFlags {
            show_points: false,
            show_lines: false,
            show_polygons: false,
        });

        assert_eq!(scene.visible_objects().count(), 1);
        assert!(scene.objects()[0].visible);
    }

    #[test]
    fn test_repeated_population_accumulates() {
        let builder = FeatureBuilder::default();
        let points = doc(POINTS_DOC);
        let mut scene = SceneState::new();

        scene.populate(&points, &builder);
        scene.populate(&points, &builder);

        assert_eq!(scene.len(), 4);
    }
}
