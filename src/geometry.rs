/// Bounding geometry input.
///
/// Turns what the user supplies on the command line into the GeoJSON
/// geometry objects kept in the selection store: either an uploaded GeoJSON
/// document or a rectangle given by its bounds.

use std::fmt;
use std::fs;
use std::path::Path;

use geojson::GeoJson;

use crate::model::Geometry;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub enum GeometryError {
    /// The file could not be read.
    Io(String),
    /// The file is not valid GeoJSON.
    Parse(String),
    /// The document holds no geometry at all.
    Empty,
    /// Rectangle bounds are not finite or not ordered west < east, south < north.
    InvalidBounds(String),
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::Io(msg) => write!(f, "Cannot read GeoJSON: {}", msg),
            GeometryError::Parse(msg) => write!(f, "Invalid GeoJSON: {}", msg),
            GeometryError::Empty => write!(f, "GeoJSON contains no geometry"),
            GeometryError::InvalidBounds(msg) => write!(f, "Invalid bounds: {}", msg),
        }
    }
}

impl std::error::Error for GeometryError {}

// ---------------------------------------------------------------------------
// GeoJSON documents
// ---------------------------------------------------------------------------

/// Geometries of a GeoJSON document in document order.
///
/// Accepts a FeatureCollection, a single Feature or a bare Geometry.
/// Features with a `null` geometry are skipped.
pub fn parse_geojson(text: &str) -> Result<Vec<Geometry>, GeometryError> {
    let doc: GeoJson = text.parse().map_err(|e: geojson::Error| GeometryError::Parse(e.to_string()))?;

    let geometries: Vec<geojson::Geometry> = match doc {
        GeoJson::Geometry(g) => vec![g],
        GeoJson::Feature(f) => f.geometry.into_iter().collect(),
        GeoJson::FeatureCollection(fc) => fc.features.into_iter().filter_map(|f| f.geometry).collect(),
    };

    if geometries.is_empty() {
        return Err(GeometryError::Empty);
    }

    geometries
        .iter()
        .map(|g| serde_json::to_value(g).map_err(|e| GeometryError::Parse(e.to_string())))
        .collect()
}

/// Read a GeoJSON file, see `parse_geojson`.
pub fn load_geojson_file(path: &Path) -> Result<Vec<Geometry>, GeometryError> {
    let text = fs::read_to_string(path).map_err(|e| GeometryError::Io(format!("{}: {}", path.display(), e)))?;
    parse_geojson(&text)
}

// ---------------------------------------------------------------------------
// Rectangles
// ---------------------------------------------------------------------------

/// Polygon for an axis-aligned lon/lat rectangle.
///
/// The ring is closed and runs counter-clockwise from the south-west corner.
pub fn rectangle(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Result<Geometry, GeometryError> {
    if ![min_lon, min_lat, max_lon, max_lat].iter().all(|v| v.is_finite()) {
        return Err(GeometryError::InvalidBounds("bounds must be finite numbers".to_string()));
    }
    if min_lon >= max_lon || min_lat >= max_lat {
        return Err(GeometryError::InvalidBounds(format!(
            "expected west < east and south < north, got {},{},{},{}",
            min_lon, min_lat, max_lon, max_lat
        )));
    }

    let ring = vec![
        vec![min_lon, min_lat],
        vec![max_lon, min_lat],
        vec![max_lon, max_lat],
        vec![min_lon, max_lat],
        vec![min_lon, min_lat],
    ];
    let polygon = geojson::Geometry::new(geojson::Value::Polygon(vec![ring]));
    serde_json::to_value(&polygon).map_err(|e| GeometryError::Parse(e.to_string()))
}

/// Parse a `west,south,east,north` argument into a rectangle polygon.
pub fn parse_bbox_arg(arg: &str) -> Result<Geometry, GeometryError> {
    let parts: Vec<f64> = arg
        .split(',')
        .map(|s| s.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| GeometryError::InvalidBounds(format!("'{}': {}", arg, e)))?;

    match parts.as_slice() {
        [w, s, e, n] => rectangle(*w, *s, *e, *n),
        _ => Err(GeometryError::InvalidBounds(format!(
            "'{}': expected 4 comma-separated numbers, got {}",
            arg,
            parts.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rectangle_ring_is_closed_and_ordered() {
        let g = rectangle(-93.1, 41.0, -75.3, 49.4).unwrap();
        assert_eq!(g["type"], json!("Polygon"));
        assert_eq!(
            g["coordinates"],
            json!([[[-93.1, 41.0], [-75.3, 41.0], [-75.3, 49.4], [-93.1, 49.4], [-93.1, 41.0]]])
        );
    }

    #[test]
    fn test_rectangle_rejects_inverted_or_degenerate_bounds() {
        assert!(matches!(rectangle(10.0, 0.0, 5.0, 1.0), Err(GeometryError::InvalidBounds(_))));
        assert!(matches!(rectangle(0.0, 1.0, 5.0, 1.0), Err(GeometryError::InvalidBounds(_))));
        assert!(matches!(rectangle(f64::NAN, 0.0, 5.0, 1.0), Err(GeometryError::InvalidBounds(_))));
    }

    #[test]
    fn test_bbox_arg() {
        let g = parse_bbox_arg("-10, -5, 10, 5").unwrap();
        assert_eq!(g["coordinates"][0][2], json!([10.0, 5.0]));

        assert!(parse_bbox_arg("1,2,3").is_err());
        assert!(parse_bbox_arg("a,b,c,d").is_err());
    }

    #[test]
    fn test_feature_collection_yields_geometries_in_order() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}},
                {"type": "Feature", "properties": {}, "geometry": null},
                {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [3.0, 4.0]}}
            ]
        });
        let geoms = parse_geojson(&doc.to_string()).unwrap();
        assert_eq!(geoms.len(), 2);
        assert_eq!(geoms[0]["coordinates"], json!([1.0, 2.0]));
        assert_eq!(geoms[1]["coordinates"], json!([3.0, 4.0]));
    }

    #[test]
    fn test_single_feature_and_bare_geometry() {
        let feature = json!({"type": "Feature", "properties": null, "geometry": {"type": "Point", "coordinates": [5.0, 6.0]}});
        assert_eq!(parse_geojson(&feature.to_string()).unwrap().len(), 1);

        let bare = json!({"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]});
        let geoms = parse_geojson(&bare.to_string()).unwrap();
        assert_eq!(geoms[0]["type"], json!("LineString"));
    }

    #[test]
    fn test_empty_collection_is_error() {
        let doc = json!({"type": "FeatureCollection", "features": []});
        assert_eq!(parse_geojson(&doc.to_string()), Err(GeometryError::Empty));
    }

    #[test]
    fn test_invalid_geojson_is_parse_error() {
        assert!(matches!(parse_geojson("{\"type\": \"Nope\"}"), Err(GeometryError::Parse(_))));
        assert!(matches!(parse_geojson("not json"), Err(GeometryError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_geojson_file(Path::new("/nonexistent/area.geojson"));
        assert!(matches!(result, Err(GeometryError::Io(_))));
    }
}
