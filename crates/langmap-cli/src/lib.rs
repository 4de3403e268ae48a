//! langmap-cli
//! ===========
//!
//! Command-line interface for the `langmap-core` enrichment pipeline.
//!
//! This crate primarily provides a binary (`langmap`). The library target
//! exists so that docs.rs renders this overview.
//!
//! Quick start
//! -----------
//!
//! ```text
//! cargo install langmap-cli
//! langmap --help
//! langmap stats
//! langmap country FRA
//! langmap export --format geojson --output countries.geojson
//! ```
//!
//! Offline use with local copies of both datasets:
//!
//! ```text
//! langmap --boundaries data/countries.geojson.gz --metadata data/countries.json countries
//! ```
//!
//! For programmatic access use the `langmap-core` crate directly.
#![cfg_attr(docsrs, feature(doc_cfg))]
