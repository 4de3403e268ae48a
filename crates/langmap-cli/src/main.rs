//! langmap: command-line front end for langmap-core
//!
//! Loads the boundary GeoJSON and the country metadata, joins them, and
//! prints or exports the enriched records.
//!
//! Usage examples
//! --------------
//!
//! - Show how the run went (matches per step, geometry failures, CRS used)
//!   $ langmap stats
//!
//! - List all countries
//!   $ langmap countries
//!
//! - Show one country by ISO3 code or name
//!   $ langmap country fra
//!   $ langmap country "cote d'ivoire"
//!
//! - Export for a map renderer
//!   $ langmap export --format geojson --output countries.geojson
//!
//! Data sources
//! ------------
//!
//! By default both datasets are fetched over HTTP. `--boundaries` and
//! `--metadata` (or the `[sources]` table of a `--config` file) accept a URL
//! or a local path; `.gz` files are decompressed on the fly.
mod args;
mod logger;

use crate::args::{parse_crs_list, CliArgs, Commands, ExportFormat};
use anyhow::Context;
use clap::Parser;
use langmap_core::prelude::*;
use std::fs::File;
use std::io::{self, BufWriter, Write};

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    logger::init_logger(args.log_level.map(Into::into));

    let mut config = match &args.config {
        Some(path) => AtlasConfig::load_from_path(path)?,
        None => AtlasConfig::default(),
    };
    if let Some(b) = args.boundaries {
        config.sources.boundaries = b;
    }
    if let Some(m) = args.metadata {
        config.sources.metadata = m;
    }
    if let Some(crs) = args.crs.as_deref() {
        let preference = parse_crs_list(crs);
        anyhow::ensure!(!preference.is_empty(), "--crs needs at least one identifier");
        config.projection.preference = preference;
    }

    let mut cache = SourceCache::new(
        ConfiguredSource::from_config(&config.sources),
        config.sources.cache_ttl(),
    );
    let atlas = Atlas::build(&mut cache, &config).context("loading boundary dataset")?;

    match args.command {
        Commands::Stats => {
            let stats = atlas.stats();
            println!("Enrichment statistics:");
            println!("  Features: {}", stats.features);
            println!("  Metadata records: {}", stats.metadata_records);
            println!("  Matched by code: {}", stats.matched_by_code);
            println!("  Matched by exact name: {}", stats.matched_by_name);
            println!("  Matched by name substring: {}", stats.matched_by_substring);
            println!("  Unresolved: {}", stats.unresolved);
            println!("  Without geometry: {}", stats.geometry_failures);
            println!("  Without area: {}", stats.area_failures);
            println!("  Area CRS: {}", stats.used_crs);
        }

        Commands::Countries => {
            for v in atlas.views() {
                println!("{} ({})", v.name, v.iso3);
            }
        }

        Commands::Country { query } => match atlas.find(&query) {
            Some(record) => {
                let v = DisplayView::from(record);
                println!("Country: {}", v.name);
                println!("ISO3: {}", v.iso3);
                println!("Matched by: {}", v.matched_by);
                println!("Capital: {}", v.capital);
                println!("Region: {} / {}", v.region, v.subregion);
                println!("Population: {}", v.population);
                println!("Currencies: {}", v.currencies);
                println!("Languages: {}", v.languages);
                println!("Timezones: {}", v.timezones);
                println!("Flag: {}", v.flag_url);
                println!("Lat/Lng: {}", v.latlng);
                println!("Area (sq.km): {}", v.area_sqkm);
                println!("Centroid (lat,lon): {}, {}", v.centroid_lat, v.centroid_lon);
                println!("Bounds: {}", v.bbox);
                println!("Wikipedia: {}", v.wikipedia);
                println!();
                println!("{}", atlas.disclosure());
            }
            None => {
                eprintln!("No country found for: {query}");
            }
        },

        Commands::Export { format, output } => {
            let mut out: Box<dyn Write> = match &output {
                Some(path) => Box::new(BufWriter::new(
                    File::create(path).with_context(|| format!("creating {}", path.display()))?,
                )),
                None => Box::new(BufWriter::new(io::stdout().lock())),
            };
            match format {
                ExportFormat::Json => serde_json::to_writer_pretty(&mut out, &atlas.views())?,
                ExportFormat::Geojson => {
                    serde_json::to_writer_pretty(&mut out, &atlas.feature_collection())?
                }
            }
            writeln!(out)?;
            out.flush()?;
            if let Some(path) = output {
                log::info!("wrote {} records to {}", atlas.records().len(), path.display());
            }
        }
    }

    Ok(())
}
