// crates/langmap-core/src/geometry.rs

//! # Geometry Engine
//!
//! Centroid, bounding box and projected area for one boundary feature.
//! Pure functions: no I/O, no shared state beyond the read-only transform.

use crate::error::{GeometryError, ProjectionError};
use crate::model::{BoundingBox, Centroid, GeometrySummary};
use crate::projection::{CrsTransform, FALLBACK};
use crate::text::round_to;
use geo::{Area, BoundingRect, Centroid as _, Coord, LineString, MapCoords, MultiPolygon, Polygon};
use geojson::{Position, Value};
use log::debug;

const CENTROID_DIGITS: i32 = 6;
const BBOX_DIGITS: i32 = 4;
const AREA_DIGITS: i32 = 2;
const SQM_PER_SQKM: f64 = 1_000_000.0;

fn coord(position: &Position) -> Result<Coord<f64>, GeometryError> {
    match position.as_slice() {
        [x, y, ..] if x.is_finite() && y.is_finite() => Ok(Coord { x: *x, y: *y }),
        [_, _, ..] => Err(GeometryError::NonFinite),
        _ => Err(GeometryError::Malformed(format!(
            "position has {} value(s), expected at least 2",
            position.len()
        ))),
    }
}

/// Smallest closed linear ring: three distinct corners plus the closing one.
const MIN_RING_LEN: usize = 4;

fn ring(positions: &[Position]) -> Result<LineString<f64>, GeometryError> {
    let mut coords = positions.iter().map(coord).collect::<Result<Vec<_>, _>>()?;
    if let (Some(&first), Some(&last)) = (coords.first(), coords.last()) {
        if first != last {
            coords.push(first);
        }
    }
    // Empty rings pass through and are reported as `Empty` by the caller.
    if !coords.is_empty() && coords.len() < MIN_RING_LEN {
        return Err(GeometryError::Malformed(format!(
            "linear ring has {} position(s) after closing, expected at least {MIN_RING_LEN}",
            coords.len()
        )));
    }
    Ok(LineString::new(coords))
}

fn polygon(rings: &[Vec<Position>]) -> Result<Polygon<f64>, GeometryError> {
    let (exterior, interiors) = rings.split_first().ok_or(GeometryError::Empty)?;
    let interiors = interiors
        .iter()
        .map(|r| ring(r))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(ring(exterior)?, interiors))
}

fn value_kind(value: &Value) -> &'static str {
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

/// Converts a GeoJSON geometry into a `MultiPolygon`.
///
/// Only `Polygon` and `MultiPolygon` are accepted. Positions are validated
/// here so that nothing downstream sees short or non-finite coordinates.
pub fn to_multipolygon(
    geometry: Option<&geojson::Geometry>,
) -> Result<MultiPolygon<f64>, GeometryError> {
    let geometry = geometry.ok_or(GeometryError::Missing)?;
    let polygons = match &geometry.value {
        Value::Polygon(rings) => vec![polygon(rings)?],
        Value::MultiPolygon(polys) => polys
            .iter()
            .map(|p| polygon(p))
            .collect::<Result<Vec<_>, _>>()?,
        other => return Err(GeometryError::Unsupported(value_kind(other))),
    };
    if polygons.iter().all(|p| p.exterior().0.is_empty()) {
        return Err(GeometryError::Empty);
    }
    Ok(MultiPolygon::new(polygons))
}

/// Planar area in km² (2 decimals) of `mp` projected through `transform`.
pub fn projected_area_sqkm(
    mp: &MultiPolygon<f64>,
    transform: &dyn CrsTransform,
) -> Result<f64, ProjectionError> {
    let to_projected = |c: Coord<f64>| transform.forward(c.x, c.y).map(|(x, y)| Coord { x, y });
    let projected = mp.try_map_coords(to_projected)?;
    Ok(round_to(projected.unsigned_area() / SQM_PER_SQKM, AREA_DIGITS))
}

/// Area through `transform`, retrying once through Web Mercator if the
/// selected transform rejects this geometry.
fn area_with_fallback(
    mp: &MultiPolygon<f64>,
    transform: &dyn CrsTransform,
) -> Result<f64, GeometryError> {
    projected_area_sqkm(mp, transform)
        .or_else(|e| {
            debug!("area via {} failed ({e}), retrying via {}", transform.crs(), FALLBACK.crs());
            projected_area_sqkm(mp, &FALLBACK)
        })
        .map_err(GeometryError::from)
}

/// Computes centroid, bounding box and area for one feature geometry.
///
/// Conversion failures (absent, malformed, unsupported, empty) fail the whole
/// summary. An area failure only affects `area_sqkm`; centroid and bbox stay
/// valid.
pub fn enrich_geometry(
    geometry: Option<&geojson::Geometry>,
    transform: &dyn CrsTransform,
) -> Result<GeometrySummary, GeometryError> {
    let mp = to_multipolygon(geometry)?;

    let point = mp.centroid().ok_or(GeometryError::Empty)?;
    let rect = mp.bounding_rect().ok_or(GeometryError::Empty)?;
    if !point.x().is_finite() || !point.y().is_finite() {
        return Err(GeometryError::NonFinite);
    }

    let centroid = Centroid {
        lon: round_to(point.x(), CENTROID_DIGITS),
        lat: round_to(point.y(), CENTROID_DIGITS),
    };
    let bbox = BoundingBox {
        west: round_to(rect.min().x, BBOX_DIGITS),
        south: round_to(rect.min().y, BBOX_DIGITS),
        east: round_to(rect.max().x, BBOX_DIGITS),
        north: round_to(rect.max().y, BBOX_DIGITS),
    };

    Ok(GeometrySummary {
        centroid,
        bbox,
        area_sqkm: area_with_fallback(&mp, transform),
    })
}
