use crate::util::error::RoadTilesError;
use geo_types::{Coord, LineString};
use geojson::{Feature, Value};
use serde_json::Value as JsonValue;
use tracing::debug;

/// Flattens the roads of a GeoJSON vector tile into lines.
///
/// The payload must be a `FeatureCollection`. Each `LineString` feature
/// contributes one line and each `MultiLineString` contributes all of its
/// members. Feature properties are ignored. Features that fail to parse,
/// have no geometry, use another geometry type, or carry a position with
/// fewer than two finite ordinates contribute nothing.
///
/// Lines are in GeoJSON order: x = longitude, y = latitude.
pub fn linestrings_for_vector_tile(s: &str) -> Result<Vec<LineString<f64>>, RoadTilesError> {
    let mut root: JsonValue = serde_json::from_str(s)
        .map_err(|e| RoadTilesError::GeoJsonParseError(e.to_string()))?;

    if root.get("type").and_then(JsonValue::as_str) != Some("FeatureCollection") {
        return Err(RoadTilesError::GeoJsonParseError(
            "Expected a FeatureCollection".to_string(),
        ));
    }

    let features = match root.get_mut("features").map(JsonValue::take) {
        Some(JsonValue::Array(features)) => features,
        _ => {
            return Err(RoadTilesError::GeoJsonParseError(
                "FeatureCollection has no features array".to_string(),
            ));
        }
    };

    let mut lines = Vec::new();
    let mut skipped = 0usize;

    for (idx, raw) in features.into_iter().enumerate() {
        let feature = match Feature::from_json_value(raw) {
            Ok(feature) => feature,
            Err(e) => {
                debug!(feature = idx, error = %e, "skipping malformed feature");
                skipped += 1;
                continue;
            }
        };

        let Some(geometry) = feature.geometry else {
            skipped += 1;
            continue;
        };

        match geometry.value {
            Value::LineString(positions) => match positions_to_line(&positions) {
                Some(line) => lines.push(line),
                None => {
                    debug!(feature = idx, "skipping line with bad coordinates");
                    skipped += 1;
                }
            },
            Value::MultiLineString(parts) => {
                for part in &parts {
                    match positions_to_line(part) {
                        Some(line) => lines.push(line),
                        None => {
                            debug!(feature = idx, "skipping line with bad coordinates");
                            skipped += 1;
                        }
                    }
                }
            }
            _ => skipped += 1,
        }
    }

    debug!(lines = lines.len(), skipped, "parsed vector tile");
    Ok(lines)
}

fn positions_to_line(positions: &[Vec<f64>]) -> Option<LineString<f64>> {
    positions
        .iter()
        .map(|p| match p.as_slice() {
            [x, y, ..] if x.is_finite() && y.is_finite() => Some(Coord { x: *x, y: *y }),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()
        .map(LineString::new)
}
