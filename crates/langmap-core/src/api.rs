// crates/langmap-core/src/api.rs

//! Flat, string-only views of display records for JSON output and map
//! tooltips. This is the only place the "no value" placeholder appears.

use crate::model::{DisplayRecord, GeoFeature, MatchKind};
use crate::text::format_thousands;
use serde::Serialize;
use serde_json::Value;

/// Placeholder for a missing value.
pub const UNKNOWN: &str = "—";

/// One display record rendered for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayView {
    pub name: String,
    pub iso3: String,
    pub matched_by: String,
    pub capital: String,
    pub region: String,
    pub subregion: String,
    pub population: String,
    pub currencies: String,
    pub timezones: String,
    pub languages: String,
    pub flag_url: String,
    /// The metadata source's reference point, `lat, lng`.
    pub latlng: String,
    pub area_sqkm: String,
    pub centroid_lat: String,
    pub centroid_lon: String,
    pub bbox: String,
    pub wikipedia: String,
}

fn or_unknown(v: Option<&str>) -> String {
    v.unwrap_or(UNKNOWN).to_string()
}

fn joined(items: &[String]) -> String {
    if items.is_empty() {
        UNKNOWN.to_string()
    } else {
        items.join(", ")
    }
}

fn number(v: Option<f64>) -> String {
    v.map_or_else(|| UNKNOWN.to_string(), |x| x.to_string())
}

impl From<&DisplayRecord> for DisplayView {
    fn from(r: &DisplayRecord) -> Self {
        let centroid = r.centroid();
        DisplayView {
            name: r.name.clone(),
            iso3: or_unknown(r.iso3.as_deref()),
            matched_by: or_unknown(r.matched_by.map(MatchKind::as_str)),
            capital: or_unknown(r.capital.as_deref()),
            region: or_unknown(r.region.as_deref()),
            subregion: or_unknown(r.subregion.as_deref()),
            population: r
                .population
                .map_or_else(|| UNKNOWN.to_string(), format_thousands),
            currencies: joined(&r.currencies),
            timezones: joined(&r.timezones),
            languages: joined(&r.languages),
            flag_url: or_unknown(r.flag_url.as_deref()),
            latlng: r
                .latlng
                .map_or_else(|| UNKNOWN.to_string(), |(lat, lng)| format!("{lat}, {lng}")),
            area_sqkm: number(r.area_sqkm()),
            centroid_lat: number(centroid.map(|c| c.lat)),
            centroid_lon: number(centroid.map(|c| c.lon)),
            bbox: r.bbox().map_or_else(|| UNKNOWN.to_string(), |b| b.display()),
            wikipedia: r.wikipedia_url(),
        }
    }
}

/// Pairs each feature with its record and attaches the record's view as the
/// feature's properties. Geometries are passed through unchanged.
pub fn feature_collection(
    features: &[GeoFeature],
    records: &[DisplayRecord],
) -> geojson::FeatureCollection {
    let features = features
        .iter()
        .zip(records)
        .map(|(f, r)| {
            let properties = match serde_json::to_value(DisplayView::from(r)) {
                Ok(Value::Object(map)) => Some(map),
                _ => None,
            };
            geojson::Feature {
                bbox: None,
                geometry: f.geometry.clone(),
                id: None,
                properties,
                foreign_members: None,
            }
        })
        .collect();

    geojson::FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
