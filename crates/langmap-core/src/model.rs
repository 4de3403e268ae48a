// crates/langmap-core/src/model.rs

//! Domain model: boundary features, metadata records and the display records
//! produced by the enrichment pipeline.

use crate::error::GeometryError;
use crate::raw::CountryRaw;
use serde_json::{Map, Value};

/// One boundary feature from the GeoJSON dataset.
///
/// The geometry is kept in its GeoJSON form so that malformed geometries can
/// still be carried through the pipeline and reported per feature.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeoFeature {
    pub properties: Map<String, Value>,
    pub geometry: Option<geojson::Geometry>,
    /// Set when the source had a geometry member that was not valid GeoJSON.
    pub geometry_error: Option<String>,
}

impl GeoFeature {
    pub fn new(properties: Map<String, Value>, geometry: Option<geojson::Geometry>) -> Self {
        Self {
            properties,
            geometry,
            geometry_error: None,
        }
    }

    pub fn with_invalid_geometry(properties: Map<String, Value>, error: impl ToString) -> Self {
        Self {
            properties,
            geometry: None,
            geometry_error: Some(error.to_string()),
        }
    }

    /// Returns the property under `key` as text.
    ///
    /// Strings are trimmed; numbers are rendered with their JSON spelling.
    /// Empty strings, `null`, booleans and nested values yield `None`.
    pub fn property_text(&self, key: &str) -> Option<String> {
        match self.properties.get(key)? {
            Value::String(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// First non-empty property among `keys`, in order.
    pub fn first_property<S: AsRef<str>>(&self, keys: &[S]) -> Option<String> {
        keys.iter().find_map(|k| self.property_text(k.as_ref()))
    }
}

/// A currency entry, e.g. `EUR` / `Euro`.
#[derive(Clone, Debug, PartialEq)]
pub struct Currency {
    pub code: String,
    pub name: Option<String>,
}

impl Currency {
    /// `Euro (EUR)`, or the bare code when the API gave no name.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("{name} ({})", self.code),
            None => self.code.clone(),
        }
    }
}

/// A language entry, e.g. `fra` / `French`.
#[derive(Clone, Debug, PartialEq)]
pub struct Language {
    pub code: String,
    pub name: String,
}

/// One country from the metadata source.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetadataRecord {
    pub common_name: Option<String>,
    pub official_name: Option<String>,
    pub iso3: Option<String>,
    pub capitals: Vec<String>,
    pub region: Option<String>,
    pub subregion: Option<String>,
    pub population: Option<u64>,
    pub currencies: Vec<Currency>,
    pub timezones: Vec<String>,
    pub languages: Vec<Language>,
    pub flag_url: Option<String>,
    /// `(lat, lng)` as published by the source.
    pub latlng: Option<(f64, f64)>,
}

impl MetadataRecord {
    pub fn common_name(&self) -> &str {
        self.common_name.as_deref().unwrap_or("")
    }

    pub fn iso3(&self) -> &str {
        self.iso3.as_deref().unwrap_or("")
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl From<CountryRaw> for MetadataRecord {
    fn from(c: CountryRaw) -> Self {
        let currencies = c
            .currencies
            .into_iter()
            .map(|(code, info)| Currency {
                code,
                name: non_empty(info.name),
            })
            .collect();

        let languages = c
            .languages
            .into_iter()
            .map(|(code, name)| Language { code, name })
            .collect();

        let latlng = match c.latlng.as_slice() {
            [lat, lng, ..] => Some((*lat, *lng)),
            _ => None,
        };

        MetadataRecord {
            common_name: non_empty(c.name.common),
            official_name: non_empty(c.name.official),
            iso3: non_empty(c.cca3),
            capitals: c.capital.into_iter().filter(|s| !s.trim().is_empty()).collect(),
            region: non_empty(c.region),
            subregion: non_empty(c.subregion),
            population: c.population,
            currencies,
            timezones: c.timezones,
            languages,
            flag_url: non_empty(c.flags.png).or_else(|| non_empty(c.flags.svg)),
            latlng,
        }
    }
}

/// Which resolver step produced the match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Code,
    ExactName,
    NameSubstring,
}

impl MatchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchKind::Code => "code",
            MatchKind::ExactName => "exact_name",
            MatchKind::NameSubstring => "name_substring",
        }
    }
}

/// Centroid in degrees, rounded to 6 decimals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Centroid {
    pub lon: f64,
    pub lat: f64,
}

/// Envelope in degrees, rounded to 4 decimals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    /// `SW: south,west • NE: north,east`
    pub fn display(&self) -> String {
        format!(
            "SW: {},{} • NE: {},{}",
            self.south, self.west, self.north, self.east
        )
    }
}

/// Geometry-derived values for one feature.
///
/// Area is planar: computed in the selected projection, not on the
/// ellipsoid, so it is an approximation whose quality depends on the CRS.
#[derive(Clone, Debug, PartialEq)]
pub struct GeometrySummary {
    pub centroid: Centroid,
    pub bbox: BoundingBox,
    pub area_sqkm: Result<f64, GeometryError>,
}

/// The enrichment output for one feature.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayRecord {
    pub name: String,
    pub iso3: Option<String>,
    pub matched_by: Option<MatchKind>,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub subregion: Option<String>,
    pub population: Option<u64>,
    pub currencies: Vec<String>,
    pub timezones: Vec<String>,
    pub languages: Vec<String>,
    pub flag_url: Option<String>,
    pub latlng: Option<(f64, f64)>,
    pub geometry: Result<GeometrySummary, GeometryError>,
}

impl DisplayRecord {
    pub fn is_resolved(&self) -> bool {
        self.matched_by.is_some()
    }

    pub fn centroid(&self) -> Option<Centroid> {
        self.geometry.as_ref().ok().map(|g| g.centroid)
    }

    pub fn bbox(&self) -> Option<BoundingBox> {
        self.geometry.as_ref().ok().map(|g| g.bbox)
    }

    pub fn area_sqkm(&self) -> Option<f64> {
        self.geometry
            .as_ref()
            .ok()
            .and_then(|g| g.area_sqkm.as_ref().ok().copied())
    }

    /// English Wikipedia article for the display name.
    pub fn wikipedia_url(&self) -> String {
        format!(
            "https://en.wikipedia.org/wiki/{}",
            self.name.replace(' ', "_")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature(props: Value) -> GeoFeature {
        GeoFeature::new(props.as_object().cloned().unwrap_or_default(), None)
    }

    #[test]
    fn property_text_handles_value_kinds() {
        let f = feature(json!({"a": "  FRA ", "b": -99, "c": "", "d": null, "e": true}));
        assert_eq!(f.property_text("a").as_deref(), Some("FRA"));
        assert_eq!(f.property_text("b").as_deref(), Some("-99"));
        assert_eq!(f.property_text("c"), None);
        assert_eq!(f.property_text("d"), None);
        assert_eq!(f.property_text("e"), None);
        assert_eq!(f.property_text("missing"), None);
    }

    #[test]
    fn first_property_skips_empty() {
        let f = feature(json!({"ADMIN": " ", "NAME": "Kosovo"}));
        assert_eq!(f.first_property(&["ADMIN", "NAME", "name"]).as_deref(), Some("Kosovo"));
    }

    #[test]
    fn metadata_from_raw_prefers_png_flag_and_keeps_order() {
        let raw: CountryRaw = serde_json::from_str(
            r#"{
                "name": {"common": "Switzerland"},
                "cca3": "CHE",
                "capital": ["Bern"],
                "currencies": {"CHF": {"name": "Swiss franc"}, "EUR": {"name": "Euro"}},
                "languages": {"roh": "Romansh", "fra": "French", "deu": "German", "ita": "Italian"},
                "timezones": ["UTC+01:00"],
                "flags": {"svg": "https://flagcdn.com/ch.svg", "png": "https://flagcdn.com/w320/ch.png"},
                "latlng": [47.0, 8.0]
            }"#,
        )
        .unwrap();
        let rec = MetadataRecord::from(raw);
        assert_eq!(rec.flag_url.as_deref(), Some("https://flagcdn.com/w320/ch.png"));
        assert_eq!(rec.latlng, Some((47.0, 8.0)));
        let langs: Vec<_> = rec.languages.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(langs, ["Romansh", "French", "German", "Italian"]);
        let currencies: Vec<_> = rec.currencies.iter().map(Currency::label).collect();
        assert_eq!(currencies, ["Swiss franc (CHF)", "Euro (EUR)"]);
    }

    #[test]
    fn currency_label_without_name() {
        let c = Currency {
            code: "XYZ".into(),
            name: None,
        };
        assert_eq!(c.label(), "XYZ");
    }

    #[test]
    fn bbox_display_is_sw_ne() {
        let b = BoundingBox {
            west: -5.1,
            south: 41.3,
            east: 9.56,
            north: 51.09,
        };
        assert_eq!(b.display(), "SW: 41.3,-5.1 • NE: 51.09,9.56");
    }
}
