//! GeoJSON document parsing and validation.
//!
//! Validation happens per feature: one malformed feature is dropped with a
//! warning while the rest of the document is kept.

use geojson::{Feature, GeoJson};
use serde_json::{Map, Value as JsonValue};

/// Features of one loaded GeoJSON document, in file order.
#[derive(Debug, Clone, Default)]
pub struct GeoDocument {
    pub features: Vec<Feature>,
    /// Number of features dropped during validation
    pub rejected: usize,
}

impl GeoDocument {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Parses raw bytes as a GeoJSON document.
///
/// Accepts a `FeatureCollection`, a single `Feature`, or a bare geometry.
/// Fails only if the bytes are not JSON or the root is not a usable GeoJSON
/// object.
pub fn parse_document(bytes: &[u8]) -> Result<GeoDocument, String> {
    let root: JsonValue =
        serde_json::from_slice(bytes).map_err(|e| format!("Invalid JSON: {}", e))?;

    let JsonValue::Object(mut root) = root else {
        return Err("GeoJSON root must be an object".to_string());
    };

    let root_type = root
        .get("type")
        .and_then(|t| t.as_str())
        .map(str::to_string)
        .ok_or_else(|| "GeoJSON root has no \"type\" member".to_string())?;

    match root_type.as_str() {
        "FeatureCollection" => {
            let Some(JsonValue::Array(raw_features)) = root.remove("features") else {
                return Err("FeatureCollection has no \"features\" array".to_string());
            };
            Ok(parse_features(raw_features))
        }
        "Feature" => Ok(parse_features(vec![JsonValue::Object(root)])),
        _ => {
            drop_malformed_holes(&mut root);
            let geojson = GeoJson::from_json_object(root)
                .map_err(|e| format!("Failed to parse GeoJSON: {}", e))?;
            match geojson {
                GeoJson::Geometry(geometry) => Ok(GeoDocument {
                    features: vec![Feature::from(geometry)],
                    rejected: 0,
                }),
                // Feature and FeatureCollection roots are handled above.
                _ => Err(format!("Unexpected GeoJSON root type {}", root_type)),
            }
        }
    }
}

fn parse_features(raw_features: Vec<JsonValue>) -> GeoDocument {
    let mut document = GeoDocument::default();

    for (index, raw) in raw_features.into_iter().enumerate() {
        match parse_feature(raw) {
            Ok(feature) => document.features.push(feature),
            Err(e) => {
                log::warn!("Dropping feature #{}: {}", index, e);
                document.rejected += 1;
            }
        }
    }

    document
}

fn parse_feature(raw: JsonValue) -> Result<Feature, String> {
    let JsonValue::Object(mut object) = raw else {
        return Err("feature is not an object".to_string());
    };

    // A missing geometry is treated like `null` so the builder reports it.
    normalize_member(&mut object, "geometry");
    normalize_member(&mut object, "properties");
    if let Some(JsonValue::Object(geometry)) = object.get_mut("geometry") {
        drop_malformed_holes(geometry);
    }

    Feature::from_json_object(object).map_err(|e| e.to_string())
}

/// Removes interior rings of a Polygon that would fail GeoJSON validation.
/// Holes are never rendered, so they must not cost the whole feature.
fn drop_malformed_holes(geometry: &mut Map<String, JsonValue>) {
    if geometry.get("type").and_then(|t| t.as_str()) != Some("Polygon") {
        return;
    }
    let Some(JsonValue::Array(rings)) = geometry.get_mut("coordinates") else {
        return;
    };

    let before = rings.len();
    let mut index = 0;
    rings.retain(|ring| {
        let keep = index == 0 || is_valid_ring(ring);
        index += 1;
        keep
    });

    if rings.len() < before {
        log::debug!("Dropped {} malformed interior ring(s)", before - rings.len());
    }
}

fn is_valid_ring(ring: &JsonValue) -> bool {
    ring.as_array().is_some_and(|positions| {
        positions.iter().all(|position| {
            position
                .as_array()
                .is_some_and(|p| p.len() >= 2 && p.iter().all(JsonValue::is_number))
        })
    })
}

fn normalize_member(object: &mut Map<String, JsonValue>, key: &str) {
    object.entry(key).or_insert(JsonValue::Null);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_collection_keeps_order() {
        let doc = parse_document(
            br#"{
                "type": "FeatureCollection",
                "features": [
                    { "type": "Feature", "properties": { "name": "a" },
                      "geometry": { "type": "Point", "coordinates": [-101.17, 22.23] } },
                    { "type": "Feature", "properties": { "name": "b" },
                      "geometry": { "type": "LineString", "coordinates": [[-101.17, 22.23], [-101.16, 22.24]] } }
                ]
            }"#,
        )
        .expect("document parses");

        assert_eq!(doc.len(), 2);
        assert_eq!(doc.rejected, 0);
        let names: Vec<&str> = doc
            .features
            .iter()
            .filter_map(|f| f.properties.as_ref()?.get("name")?.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_collection_is_valid() {
        let doc = parse_document(br#"{ "type": "FeatureCollection", "features": [] }"#)
            .expect("document parses");
        assert!(doc.is_empty());
    }

    #[test]
    fn test_malformed_feature_is_isolated() {
        let doc = parse_document(
            br#"{
                "type": "FeatureCollection",
                "features": [
                    { "type": "Feature", "properties": {},
                      "geometry": { "type": "Point", "coordinates": "oops" } },
                    42,
                    { "type": "Feature", "properties": {},
                      "geometry": { "type": "Point", "coordinates": [-101.17, 22.23] } }
                ]
            }"#,
        )
        .expect("document parses");

        assert_eq!(doc.len(), 1);
        assert_eq!(doc.rejected, 2);
    }

    #[test]
    fn test_short_position_drops_only_that_feature() {
        let doc = parse_document(
            br#"{
                "type": "FeatureCollection",
                "features": [
                    { "type": "Feature", "properties": {},
                      "geometry": { "type": "Point", "coordinates": [-101.17] } },
                    { "type": "Feature", "properties": {},
                      "geometry": { "type": "Point", "coordinates": [-101.17, 22.23] } }
                ]
            }"#,
        )
        .expect("document parses");

        assert_eq!(doc.len(), 1);
        assert_eq!(doc.rejected, 1);
    }

    #[test]
    fn test_malformed_hole_keeps_polygon() {
        let doc = parse_document(
            br#"{
                "type": "FeatureCollection",
                "features": [
                    { "type": "Feature", "properties": {},
                      "geometry": { "type": "Polygon", "coordinates": [
                          [[-101.18, 22.23], [-101.17, 22.23], [-101.17, 22.24], [-101.18, 22.23]],
                          [[-101.175]],
                          [[-101.176, 22.232], [-101.174, 22.232], [-101.174, 22.234], [-101.176, 22.232]]
                      ] } }
                ]
            }"#,
        )
        .expect("document parses");

        assert_eq!(doc.len(), 1);
        assert_eq!(doc.rejected, 0);
        let Some(geojson::Value::Polygon(rings)) =
            doc.features[0].geometry.as_ref().map(|g| &g.value)
        else {
            panic!("expected polygon geometry");
        };
        assert_eq!(rings.len(), 2);
    }

    #[test]
    fn test_malformed_exterior_still_rejects_feature() {
        let doc = parse_document(
            br#"{ "type": "Feature", "properties": {},
                  "geometry": { "type": "Polygon", "coordinates": [[[-101.18]]] } }"#,
        )
        .expect("document parses");

        assert!(doc.is_empty());
        assert_eq!(doc.rejected, 1);
    }

    #[test]
    fn test_missing_geometry_member_becomes_null() {
        let doc = parse_document(
            br#"{ "type": "FeatureCollection",
                  "features": [ { "type": "Feature", "properties": {} } ] }"#,
        )
        .expect("document parses");

        assert_eq!(doc.len(), 1);
        assert!(doc.features[0].geometry.is_none());
    }

    #[test]
    fn test_missing_properties_member_is_accepted() {
        let doc = parse_document(
            br#"{ "type": "Feature",
                  "geometry": { "type": "Point", "coordinates": [-101.17, 22.23] } }"#,
        )
        .expect("document parses");

        assert_eq!(doc.len(), 1);
        assert!(doc.features[0].geometry.is_some());
    }

    #[test]
    fn test_bare_geometry_is_wrapped() {
        let doc = parse_document(
            br#"{ "type": "Polygon",
                  "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]] }"#,
        )
        .expect("document parses");

        assert_eq!(doc.len(), 1);
        assert!(doc.features[0].geometry.is_some());
    }

    #[test]
    fn test_invalid_documents_fail() {
        assert!(parse_document(b"not json").is_err());
        assert!(parse_document(b"[1, 2, 3]").is_err());
        assert!(parse_document(br#"{ "features": [] }"#).is_err());
        assert!(parse_document(br#"{ "type": "FeatureCollection" }"#).is_err());
        assert!(parse_document(br#"{ "type": "Bogus" }"#).is_err());
    }
}
