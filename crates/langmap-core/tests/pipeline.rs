// crates/langmap-core/tests/pipeline.rs

use langmap_core::error::ProjectionError;
use langmap_core::loader::{parse_boundaries, parse_metadata};
use langmap_core::projection::{build_transform, select_projection, CrsTransform, WEB_MERCATOR};
use langmap_core::{
    Atlas, AtlasConfig, DataSource, DisplayView, GeoFeature, KeyAliases, LangmapError, MatchKind,
    MetadataRecord, Pipeline, ProjectionSelection, ResolutionIndex, SourceCache, UNKNOWN,
};
use std::cell::Cell;
use std::sync::Arc;
use std::time::Duration;

const BOUNDARIES: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature",
     "properties": {"ADMIN": "France", "ADM0_A3": "FRA"},
     "geometry": {"type": "MultiPolygon", "coordinates": [
        [[[-5.0, 42.5], [8.0, 42.5], [8.0, 51.0], [-5.0, 51.0], [-5.0, 42.5]]],
        [[[8.5, 41.4], [9.6, 41.4], [9.6, 43.0], [8.5, 43.0], [8.5, 41.4]]]
     ]}},
    {"type": "Feature",
     "properties": {"ADMIN": "Kosovo", "ISO_A3": "-99"},
     "geometry": {"type": "Polygon", "coordinates": [
        [[20.0, 42.0], [21.8, 42.0], [21.8, 43.2], [20.0, 43.2], [20.0, 42.0]]
     ]}},
    {"type": "Feature",
     "properties": {"ADMIN": "Germany", "ISO_A3": "XXX"},
     "geometry": {"type": "Polygon", "coordinates": [
        [[6.0, 47.3], [15.0, 47.3], [15.0, 55.0], [6.0, 55.0], [6.0, 47.3]]
     ]}},
    {"type": "Feature",
     "properties": {"ADMIN": "Broken Land"},
     "geometry": {"type": "Polygon", "coordinates": [[["a", "b"]]]}},
    {"type": "Feature",
     "properties": {"NAME": "Null Island"},
     "geometry": null}
  ]
}"#;

const METADATA: &str = r#"[
  {"name": {"common": "France", "official": "French Republic"}, "cca3": "FRA",
   "capital": ["Paris"], "region": "Europe", "subregion": "Western Europe",
   "population": 67000000, "currencies": {"EUR": {"name": "Euro", "symbol": "€"}},
   "timezones": ["UTC+01:00"], "languages": {"fra": "French"},
   "flags": {"png": "https://flagcdn.com/w320/fr.png", "svg": "https://flagcdn.com/fr.svg"},
   "latlng": [46.0, 2.0]},
  {"name": {"common": "Germany"}, "cca3": "DEU", "capital": ["Berlin"], "population": 83240525},
  {"name": {"common": "Republic of Kosovo"}, "cca3": "UNK", "capital": ["Pristina"]}
]"#;

struct Fixture {
    boundary_calls: Cell<usize>,
    metadata_calls: Cell<usize>,
    metadata: Option<&'static str>,
}

impl Fixture {
    fn new(metadata: Option<&'static str>) -> Self {
        Self {
            boundary_calls: Cell::new(0),
            metadata_calls: Cell::new(0),
            metadata,
        }
    }
}

impl DataSource for Fixture {
    fn fetch_boundaries(&self) -> langmap_core::Result<Vec<GeoFeature>> {
        self.boundary_calls.set(self.boundary_calls.get() + 1);
        parse_boundaries(BOUNDARIES.as_bytes())
    }

    fn fetch_metadata(&self) -> langmap_core::Result<Vec<MetadataRecord>> {
        self.metadata_calls.set(self.metadata_calls.get() + 1);
        match self.metadata {
            Some(doc) => parse_metadata(doc.as_bytes()),
            None => Err(LangmapError::SourceUnavailable {
                source_name: "metadata".into(),
                message: "503 Service Unavailable".into(),
            }),
        }
    }
}

fn atlas(metadata: Option<&'static str>) -> Atlas {
    let mut cache = SourceCache::new(Fixture::new(metadata), Duration::from_secs(3600));
    Atlas::build(&mut cache, &AtlasConfig::default()).unwrap()
}

#[test]
fn code_match_and_population_display() {
    let atlas = atlas(Some(METADATA));
    let france = &atlas.records()[0];
    assert_eq!(france.matched_by, Some(MatchKind::Code));
    assert_eq!(france.name, "France");

    let view = DisplayView::from(france);
    assert_eq!(view.population, "67,000,000");
    assert_eq!(view.capital, "Paris");
    assert_eq!(view.currencies, "Euro (EUR)");
    assert_eq!(view.flag_url, "https://flagcdn.com/w320/fr.png");
}

#[test]
fn no_data_code_falls_through_to_substring() {
    let atlas = atlas(Some(METADATA));
    let kosovo = &atlas.records()[1];
    assert_eq!(kosovo.matched_by, Some(MatchKind::NameSubstring));
    assert_eq!(kosovo.name, "Republic of Kosovo");
    assert_eq!(kosovo.capital.as_deref(), Some("Pristina"));
}

#[test]
fn unknown_code_falls_back_to_exact_name() {
    let atlas = atlas(Some(METADATA));
    let germany = &atlas.records()[2];
    assert_eq!(germany.matched_by, Some(MatchKind::ExactName));
    assert_eq!(germany.iso3.as_deref(), Some("DEU"));
}

#[test]
fn malformed_and_null_geometry_degrade_to_unknown() {
    let atlas = atlas(Some(METADATA));
    for record in &atlas.records()[3..] {
        assert!(record.geometry.is_err(), "{}", record.name);
        let view = DisplayView::from(record);
        for field in [&view.area_sqkm, &view.centroid_lat, &view.centroid_lon, &view.bbox] {
            assert_eq!(field, UNKNOWN);
        }
    }
    assert_eq!(atlas.records()[3].name, "Broken Land");
    assert_eq!(atlas.records()[4].name, "Null Island");
    assert_eq!(atlas.stats().geometry_failures, 2);
}

#[test]
fn bounding_boxes_are_ordered() {
    let atlas = atlas(Some(METADATA));
    let mut seen = 0;
    for bbox in atlas.records().iter().filter_map(|r| r.bbox()) {
        assert!(bbox.west <= bbox.east);
        assert!(bbox.south <= bbox.north);
        seen += 1;
    }
    assert_eq!(seen, 3);

    let france = atlas.records()[0].bbox().unwrap();
    assert_eq!((france.west, france.south, france.east, france.north), (-5.0, 41.4, 9.6, 51.0));
}

#[test]
fn enrichment_is_idempotent() {
    let features = parse_boundaries(BOUNDARIES.as_bytes()).unwrap();
    let index = ResolutionIndex::build(parse_metadata(METADATA.as_bytes()).unwrap());
    let selection = ProjectionSelection::shared();
    let aliases = KeyAliases::default();
    let pipeline = Pipeline::new(&index, selection.transform(), &aliases);

    let first = pipeline.enrich_all(&features);
    let second = pipeline.enrich_all(&features);
    assert_eq!(first, second);
    assert_eq!(first.len(), features.len());
    assert_eq!(pipeline.iter(&features).collect::<Vec<_>>(), first);
}

#[test]
fn metadata_outage_is_not_fatal() {
    let atlas = atlas(None);
    assert_eq!(atlas.records().len(), 5);
    assert_eq!(atlas.stats().metadata_records, 0);
    assert_eq!(atlas.stats().unresolved, 5);

    let france = DisplayView::from(&atlas.records()[0]);
    assert_eq!(france.name, "France");
    assert_eq!(france.iso3, "FRA");
    assert_eq!(france.population, UNKNOWN);
    assert_ne!(france.area_sqkm, UNKNOWN);
}

#[test]
fn metadata_error_payload_is_not_fatal() {
    let atlas = atlas(Some(r#"{"status": 500, "message": "boom"}"#));
    assert_eq!(atlas.stats().resolved(), 0);
}

#[test]
fn boundary_failure_is_fatal() {
    struct NoBoundaries;
    impl DataSource for NoBoundaries {
        fn fetch_boundaries(&self) -> langmap_core::Result<Vec<GeoFeature>> {
            Err(LangmapError::NotFound("countries.geojson".into()))
        }
        fn fetch_metadata(&self) -> langmap_core::Result<Vec<MetadataRecord>> {
            Ok(Vec::new())
        }
    }
    let mut cache = SourceCache::new(NoBoundaries, Duration::from_secs(60));
    let err = Atlas::build(&mut cache, &AtlasConfig::default()).unwrap_err();
    assert!(matches!(err, LangmapError::NotFound(_)));
}

#[test]
fn cache_is_reused_across_builds() {
    let mut cache = SourceCache::new(Fixture::new(Some(METADATA)), Duration::from_secs(3600));
    let config = AtlasConfig::default();
    let a = Atlas::build(&mut cache, &config).unwrap();
    let b = Atlas::build(&mut cache, &config).unwrap();
    assert_eq!(a.records(), b.records());
    assert_eq!(cache.source().boundary_calls.get(), 1);
    assert_eq!(cache.source().metadata_calls.get(), 1);

    cache.invalidate();
    Atlas::build(&mut cache, &config).unwrap();
    assert_eq!(cache.source().boundary_calls.get(), 2);
}

#[test]
fn second_projection_reported_when_first_cannot_be_built() {
    let selection = select_projection(&["EPSG:6933", "ESRI:54009"], |crs| {
        if crs == "EPSG:6933" {
            Err(ProjectionError::UnknownCrs(crs.to_string()))
        } else {
            build_transform(crs)
        }
    });
    assert_eq!(selection.used_crs(), "ESRI:54009");
    assert_eq!(selection.transform().crs(), "ESRI:54009");
    assert!(selection.is_equal_area());
}

#[test]
fn web_mercator_is_last_resort() {
    let selection = select_projection(&["EPSG:0000"], build_transform);
    assert_eq!(selection.used_crs(), WEB_MERCATOR);
    assert!(!selection.is_equal_area());
    assert!(selection.disclosure().contains(WEB_MERCATOR));
}

#[test]
fn shared_state_is_thread_safe() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResolutionIndex>();
    assert_send_sync::<ProjectionSelection>();
    assert_send_sync::<Atlas>();
    let _: Arc<dyn CrsTransform> = Arc::from(build_transform("EPSG:6933").unwrap());
}

#[test]
fn geojson_export_round_trips_through_serde() {
    let atlas = atlas(Some(METADATA));
    let fc = atlas.feature_collection();
    assert_eq!(fc.features.len(), 5);

    let text = serde_json::to_string(&fc).unwrap();
    let back: geojson::FeatureCollection = serde_json::from_str(&text).unwrap();
    let props = back.features[0].properties.as_ref().unwrap();
    assert_eq!(props["population"], "67,000,000");
    assert_eq!(props["matched_by"], "code");
    assert!(back.features[4].geometry.is_none());
}
