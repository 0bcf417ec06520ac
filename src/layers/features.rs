use std::path::Path;

use geo_types::{Coord, LineString, MultiLineString, Point};
use geojson::{Feature, GeoJson, JsonObject, Value};

use super::error::Error;

/// Reads every feature of a GeoJSON file.
pub fn read_features<P: AsRef<Path>>(path: P) -> Result<Vec<Feature>, Error> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    parse_features(&contents)
}

/// Parses GeoJSON text into its features.
///
/// A bare `Feature` or `Geometry` is treated as a one-element collection.
pub fn parse_features(contents: &str) -> Result<Vec<Feature>, Error> {
    let geojson = contents.parse::<GeoJson>()?;
    let features = match geojson {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(geometry) => vec![Feature {
            bbox: None,
            geometry: Some(geometry),
            id: None,
            properties: None,
            foreign_members: None,
        }],
    };
    Ok(features)
}

pub fn properties(feature: &Feature) -> JsonObject {
    feature.properties.clone().unwrap_or_default()
}

/// Builds a multi-part line from a `LineString` or `MultiLineString` value.
pub fn line_geometry(value: &Value) -> Option<MultiLineString> {
    match value {
        Value::LineString(line) => Some(MultiLineString::new(vec![to_line_string(line)])),
        Value::MultiLineString(lines) => Some(MultiLineString::new(
            lines.iter().map(|line| to_line_string(line)).collect(),
        )),
        _ => None,
    }
}

/// Extracts the points of a `Point` or `MultiPoint` value.
pub fn point_geometry(value: &Value) -> Option<Vec<Point>> {
    match value {
        Value::Point(position) => to_coord(position).map(|c| vec![Point::from(c)]),
        Value::MultiPoint(positions) => Some(
            positions
                .iter()
                .filter_map(|position| to_coord(position))
                .map(Point::from)
                .collect(),
        ),
        _ => None,
    }
}

pub fn geometry_type(value: &Value) -> &'static str {
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

fn to_line_string(positions: &[Vec<f64>]) -> LineString {
    positions.iter().filter_map(|position| to_coord(position)).collect()
}

// Extra ordinates (elevation) are dropped.
fn to_coord(position: &[f64]) -> Option<Coord> {
    match position {
        [x, y, ..] => Some(Coord { x: *x, y: *y }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_collection_and_bare_geometry() {
        let collection = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"name": "1"},
                 "geometry": {"type": "Point", "coordinates": [120.2, 23.0]}},
                {"type": "Feature", "properties": null, "geometry": null}
            ]
        }"#;
        let features = parse_features(collection).unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(properties(&features[0])["name"], "1");
        assert!(properties(&features[1]).is_empty());

        let bare = r#"{"type": "LineString", "coordinates": [[0, 0], [1, 1]]}"#;
        let features = parse_features(bare).unwrap();
        assert_eq!(features.len(), 1);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(parse_features("{not json"), Err(Error::GeoJson(_))));
    }

    #[test]
    fn test_line_geometry_drops_elevation() {
        let value = Value::MultiLineString(vec![
            vec![vec![0.0, 0.0, 5.0], vec![1.0, 0.0, 6.0]],
            vec![vec![2.0, 0.0], vec![3.0, 0.0], vec![4.0, 0.0]],
        ]);
        let lines = line_geometry(&value).unwrap();
        assert_eq!(lines.0.len(), 2);
        assert_eq!(lines.0[0].0[1], Coord { x: 1.0, y: 0.0 });
        assert_eq!(lines.0[1].0.len(), 3);
        assert!(line_geometry(&Value::Point(vec![0.0, 0.0])).is_none());
    }

    #[test]
    fn test_point_geometry() {
        let single = point_geometry(&Value::Point(vec![120.1, 22.9])).unwrap();
        assert_eq!(single, vec![Point::new(120.1, 22.9)]);
        let multi =
            point_geometry(&Value::MultiPoint(vec![vec![1.0, 2.0], vec![3.0, 4.0]])).unwrap();
        assert_eq!(multi.len(), 2);
        assert!(point_geometry(&Value::LineString(vec![])).is_none());
    }
}
